//! HTTP handlers, grouped by resource.
//!
//! Handlers bind the request, call one engine or repository method, and
//! let [`ApiError`](crate::ApiError) pick the status code.

pub mod health;
pub mod items;
pub mod pointlings;
pub mod users;

use axum::routing::{get, patch, post};
use axum::Router;
use serde::Deserialize;

use crate::AppState;

/// `?limit=&offset=` on list endpoints. Out-of-range values fall back to
/// defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}/points", patch(users::set_points))
        .route("/users/{user_id}/points/award", post(users::award_points))
        .route("/users/{user_id}/points/spend", post(users::spend_points))
        .route("/users/{user_id}/points/history", get(users::spend_history))
        .route("/users/{user_id}/pointlings", get(users::list_pointlings))
        .route("/pointlings", post(pointlings::create_pointling))
        .route("/pointlings/{pointling_id}", get(pointlings::get_pointling))
        .route(
            "/pointlings/{pointling_id}/nickname",
            patch(pointlings::update_nickname),
        )
        .route("/pointlings/{pointling_id}/look", patch(pointlings::update_look))
        .route("/pointlings/{pointling_id}/xp", post(pointlings::grant_xp))
        .route(
            "/pointlings/{pointling_id}/xp/history",
            get(pointlings::xp_history),
        )
        .route("/pointlings/{pointling_id}/items", get(items::inventory))
        .route(
            "/pointlings/{pointling_id}/items/{item_id}",
            post(items::acquire_item),
        )
        .route(
            "/pointlings/{pointling_id}/items/{item_id}/equip",
            patch(items::toggle_equipped),
        )
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/{item_id}", get(items::get_item));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod testing {
    use pointlings_core::{ItemCategory, ItemId, ItemRarity, ItemSlot, NewItem, PointlingId, UserId};
    use pointlings_db::{Database, DbConfig};

    use crate::AppState;

    pub async fn state() -> AppState {
        AppState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    pub async fn player(state: &AppState, balance: i64) -> (UserId, PointlingId) {
        let user = state.db.users().create_user("Tester", balance).await.unwrap();
        let pointling = state.db.pointlings().create(user.user_id, None).await.unwrap();
        (user.user_id, pointling.pointling_id)
    }

    pub async fn hat(state: &AppState, price: Option<i64>, unlock: Option<i64>) -> ItemId {
        state
            .db
            .items()
            .create(NewItem {
                category: ItemCategory::Accessory,
                slot: Some(ItemSlot::Hat),
                asset_id: "hat".to_string(),
                name: "Hat".to_string(),
                rarity: ItemRarity::Common,
                price_points: price,
                unlock_level: unlock,
            })
            .await
            .unwrap()
            .item_id
    }
}
