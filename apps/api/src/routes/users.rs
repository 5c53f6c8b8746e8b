//! User, balance and purchase endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pointlings_core::{
    CommerceEngine, ItemId, Page, Pointling, PointlingId, Purchase, SpendHistoryEntry, User,
    UserId,
};
use serde::Deserialize;
use tracing::info;

use super::PageQuery;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub display_name: String,
    #[serde(default)]
    pub initial_balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetPointsRequest {
    pub new_balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct AwardPointsRequest {
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct SpendPointsRequest {
    pub item_id: ItemId,
    pub pointling_id: PointlingId,
}

/// `POST /api/v1/users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .db
        .users()
        .create_user(&req.display_name, req.initial_balance)
        .await?;

    info!(user_id = user.user_id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /api/v1/users?limit=&offset=`
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let page = Page::new(query.limit, query.offset);
    Ok(Json(state.db.users().list(page).await?))
}

/// `GET /api/v1/users/{user_id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<User>> {
    state
        .db
        .users()
        .get_by_id(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User", user_id))
}

/// `PATCH /api/v1/users/{user_id}/points` (absolute set)
pub async fn set_points(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(req): Json<SetPointsRequest>,
) -> ApiResult<Json<User>> {
    let user = state
        .db
        .users()
        .set_point_balance(user_id, req.new_balance)
        .await?;
    Ok(Json(user))
}

/// `POST /api/v1/users/{user_id}/points/award`
pub async fn award_points(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(req): Json<AwardPointsRequest>,
) -> ApiResult<Json<User>> {
    let user = state.db.users().award_points(user_id, req.amount).await?;
    info!(user_id, amount = req.amount, "Points awarded");
    Ok(Json(user))
}

/// `POST /api/v1/users/{user_id}/points/spend`
pub async fn spend_points(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(req): Json<SpendPointsRequest>,
) -> ApiResult<Json<Purchase>> {
    let purchase = CommerceEngine::new(state.db.store())
        .spend_points(user_id, req.item_id, req.pointling_id)
        .await?;
    Ok(Json(purchase))
}

/// `GET /api/v1/users/{user_id}/points/history?limit=&offset=`
pub async fn spend_history(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<SpendHistoryEntry>>> {
    let page = Page::new(query.limit, query.offset);
    let history = state.db.point_spends().list_for_user(user_id, page).await?;
    Ok(Json(history))
}

/// `GET /api/v1/users/{user_id}/pointlings`
pub async fn list_pointlings(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<Vec<Pointling>>> {
    if state.db.users().get_by_id(user_id).await?.is_none() {
        return Err(ApiError::not_found("User", user_id));
    }

    Ok(Json(state.db.pointlings().list_for_user(user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::routes::testing::{hat, player, state};
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let state = state().await;

        let (status, Json(user)) = create_user(
            State(state.clone()),
            Json(CreateUserRequest {
                display_name: " Mina ".into(),
                initial_balance: 25,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.display_name, "Mina");

        let Json(fetched) = get_user(State(state.clone()), Path(user.user_id))
            .await
            .unwrap();
        assert_eq!(fetched.point_balance, 25);

        let err = get_user(State(state), Path(999)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_user_rejects_blank_name() {
        let err = create_user(
            State(state().await),
            Json(CreateUserRequest {
                display_name: "   ".into(),
                initial_balance: 0,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_points_set_and_award() {
        let state = state().await;
        let (user_id, _) = player(&state, 10).await;

        let Json(user) = set_points(
            State(state.clone()),
            Path(user_id),
            Json(SetPointsRequest { new_balance: 40 }),
        )
        .await
        .unwrap();
        assert_eq!(user.point_balance, 40);

        let Json(user) = award_points(
            State(state.clone()),
            Path(user_id),
            Json(AwardPointsRequest { amount: 5 }),
        )
        .await
        .unwrap();
        assert_eq!(user.point_balance, 45);

        let err = set_points(
            State(state),
            Path(user_id),
            Json(SetPointsRequest { new_balance: -1 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_spend_points_statuses() {
        let state = state().await;
        let (user_id, pointling_id) = player(&state, 80).await;
        let cheap = hat(&state, Some(30), None).await;
        let pricey = hat(&state, Some(500), None).await;

        let Json(purchase) = spend_points(
            State(state.clone()),
            Path(user_id),
            Json(SpendPointsRequest {
                item_id: cheap,
                pointling_id,
            }),
        )
        .await
        .unwrap();
        assert_eq!(purchase.new_balance, 50);

        let err = spend_points(
            State(state.clone()),
            Path(user_id),
            Json(SpendPointsRequest {
                item_id: pricey,
                pointling_id,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::PAYMENT_REQUIRED);

        let err = spend_points(
            State(state.clone()),
            Path(user_id),
            Json(SpendPointsRequest {
                item_id: cheap,
                pointling_id,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let Json(user) = get_user(State(state.clone()), Path(user_id))
            .await
            .unwrap();
        assert_eq!(user.point_balance, 50);

        let Json(history) = spend_history(
            State(state),
            Path(user_id),
            Query(PageQuery::default()),
        )
        .await
        .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].spend.points_spent, 30);
    }

    #[tokio::test]
    async fn test_list_pointlings_for_missing_user() {
        let err = list_pointlings(State(state().await), Path(42))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
