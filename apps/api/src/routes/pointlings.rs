//! Pointling endpoints: creation, cosmetics and XP.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pointlings_core::validation::history_limit;
use pointlings_core::{Look, Pointling, PointlingId, UserId, XpEngine, XpEvent, XpGrant, XpSource};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePointlingRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NicknameRequest {
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookRequest {
    pub look: Look,
}

#[derive(Debug, Deserialize)]
pub struct GrantXpRequest {
    pub source: XpSource,
    pub amount: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// `POST /api/v1/pointlings`
pub async fn create_pointling(
    State(state): State<AppState>,
    Json(req): Json<CreatePointlingRequest>,
) -> ApiResult<(StatusCode, Json<Pointling>)> {
    let pointling = state
        .db
        .pointlings()
        .create(req.user_id, req.nickname.as_deref())
        .await?;

    info!(
        pointling_id = pointling.pointling_id,
        user_id = req.user_id,
        "Pointling created"
    );
    Ok((StatusCode::CREATED, Json(pointling)))
}

/// `GET /api/v1/pointlings/{pointling_id}`
pub async fn get_pointling(
    State(state): State<AppState>,
    Path(pointling_id): Path<PointlingId>,
) -> ApiResult<Json<Pointling>> {
    state
        .db
        .pointlings()
        .get_by_id(pointling_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Pointling", pointling_id))
}

/// `PATCH /api/v1/pointlings/{pointling_id}/nickname`
///
/// A null or blank nickname clears it.
pub async fn update_nickname(
    State(state): State<AppState>,
    Path(pointling_id): Path<PointlingId>,
    Json(req): Json<NicknameRequest>,
) -> ApiResult<Json<Pointling>> {
    let pointling = state
        .db
        .pointlings()
        .update_nickname(pointling_id, req.nickname.as_deref())
        .await?;
    Ok(Json(pointling))
}

/// `PATCH /api/v1/pointlings/{pointling_id}/look`
pub async fn update_look(
    State(state): State<AppState>,
    Path(pointling_id): Path<PointlingId>,
    Json(req): Json<LookRequest>,
) -> ApiResult<Json<Pointling>> {
    let pointling = state
        .db
        .pointlings()
        .update_look(pointling_id, &req.look)
        .await?;
    Ok(Json(pointling))
}

/// `POST /api/v1/pointlings/{pointling_id}/xp`
pub async fn grant_xp(
    State(state): State<AppState>,
    Path(pointling_id): Path<PointlingId>,
    Json(req): Json<GrantXpRequest>,
) -> ApiResult<Json<XpGrant>> {
    let grant = XpEngine::new(state.db.store())
        .grant_xp(pointling_id, req.source, req.amount)
        .await?;
    Ok(Json(grant))
}

/// `GET /api/v1/pointlings/{pointling_id}/xp/history?limit=`
pub async fn xp_history(
    State(state): State<AppState>,
    Path(pointling_id): Path<PointlingId>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<XpEvent>>> {
    let events = state
        .db
        .xp_events()
        .list_for_pointling(pointling_id, history_limit(query.limit))
        .await?;
    Ok(Json(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::routes::testing::{player, state};
    use axum::response::IntoResponse;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_pointling() {
        let state = state().await;
        let (user_id, _) = player(&state, 0).await;

        let (status, Json(pointling)) = create_pointling(
            State(state.clone()),
            Json(CreatePointlingRequest {
                user_id,
                nickname: Some("Blip".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(pointling.level, 1);
        assert_eq!(pointling.required_xp, 3);
        assert_eq!(pointling.nickname.as_deref(), Some("Blip"));

        let err = create_pointling(
            State(state),
            Json(CreatePointlingRequest {
                user_id: 999,
                nickname: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_nickname_and_look() {
        let state = state().await;
        let (_, pointling_id) = player(&state, 0).await;

        let Json(pointling) = update_nickname(
            State(state.clone()),
            Path(pointling_id),
            Json(NicknameRequest {
                nickname: Some("Zed".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(pointling.nickname.as_deref(), Some("Zed"));

        let err = update_nickname(
            State(state.clone()),
            Path(pointling_id),
            Json(NicknameRequest {
                nickname: Some("x".repeat(33)),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let look = json!({ "color": "teal", "eyes": 2 });
        let Json(pointling) = update_look(
            State(state),
            Path(pointling_id),
            Json(LookRequest {
                look: look.as_object().cloned().unwrap(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(pointling.look["color"], "teal");
    }

    #[tokio::test]
    async fn test_grant_xp_and_history() {
        let state = state().await;
        let (_, pointling_id) = player(&state, 0).await;

        let Json(grant) = grant_xp(
            State(state.clone()),
            Path(pointling_id),
            Json(GrantXpRequest {
                source: XpSource::Daily,
                amount: 10,
            }),
        )
        .await
        .unwrap();
        assert!(grant.leveled_up);
        assert_eq!(grant.new_level, Some(2));

        let err = grant_xp(
            State(state.clone()),
            Path(pointling_id),
            Json(GrantXpRequest {
                source: XpSource::Daily,
                amount: 1,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);

        let err = grant_xp(
            State(state.clone()),
            Path(pointling_id),
            Json(GrantXpRequest {
                source: XpSource::Play,
                amount: 21,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(events) = xp_history(
            State(state),
            Path(pointling_id),
            Query(HistoryQuery::default()),
        )
        .await
        .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, XpSource::Daily);
    }

    #[tokio::test]
    async fn test_grant_xp_missing_pointling() {
        let err = grant_xp(
            State(state().await),
            Path(77),
            Json(GrantXpRequest {
                source: XpSource::Play,
                amount: 5,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_request_parsing() {
        let req: GrantXpRequest =
            serde_json::from_value(json!({ "source": "RECEIPT", "amount": 4 })).unwrap();
        assert_eq!(req.source, XpSource::Receipt);

        assert!(serde_json::from_value::<GrantXpRequest>(json!({ "source": "BONUS", "amount": 4 }))
            .is_err());
    }
}
