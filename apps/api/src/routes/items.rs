//! Catalog and inventory endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pointlings_core::{
    CommerceEngine, InventoryEngine, Item, ItemCategory, ItemFilter, ItemId, ItemRarity,
    ItemSlot, NewItem, PointlingId, PointlingItem,
};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `?category=&rarity=&slot=`, upper-case values as serialized.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<ItemCategory>,
    pub rarity: Option<ItemRarity>,
    pub slot: Option<ItemSlot>,
}

impl From<CatalogQuery> for ItemFilter {
    fn from(query: CatalogQuery) -> Self {
        ItemFilter {
            category: query.category,
            rarity: query.rarity,
            slot: query.slot,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub equipped: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct EquipRequest {
    pub equipped: bool,
}

/// `GET /api/v1/items`
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().list(query.into()).await?))
}

/// `POST /api/v1/items`
pub async fn create_item(
    State(state): State<AppState>,
    Json(item): Json<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state.db.items().create(item).await?;
    info!(item_id = item.item_id, name = %item.name, "Catalog item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/v1/items/{item_id}`
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> ApiResult<Json<Item>> {
    state
        .db
        .items()
        .get_by_id(item_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Item", item_id))
}

/// `GET /api/v1/pointlings/{pointling_id}/items?equipped=`
pub async fn inventory(
    State(state): State<AppState>,
    Path(pointling_id): Path<PointlingId>,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<Json<Vec<PointlingItem>>> {
    let items = state
        .db
        .inventory()
        .list_for_pointling(pointling_id, query.equipped)
        .await?;
    Ok(Json(items))
}

/// `POST /api/v1/pointlings/{pointling_id}/items/{item_id}` (level unlock)
pub async fn acquire_item(
    State(state): State<AppState>,
    Path((pointling_id, item_id)): Path<(PointlingId, ItemId)>,
) -> ApiResult<(StatusCode, Json<PointlingItem>)> {
    let owned = CommerceEngine::new(state.db.store())
        .acquire_item(pointling_id, item_id)
        .await?;
    Ok((StatusCode::CREATED, Json(owned)))
}

/// `PATCH /api/v1/pointlings/{pointling_id}/items/{item_id}/equip`
pub async fn toggle_equipped(
    State(state): State<AppState>,
    Path((pointling_id, item_id)): Path<(PointlingId, ItemId)>,
    Json(req): Json<EquipRequest>,
) -> ApiResult<Json<PointlingItem>> {
    let owned = InventoryEngine::new(state.db.store())
        .toggle_equipped(pointling_id, item_id, req.equipped)
        .await?;
    Ok(Json(owned))
}
