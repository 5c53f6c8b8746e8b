//! # Item Repository
//!
//! The cosmetic item catalog.

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use pointlings_core::validation::validate_new_item;
use pointlings_core::{Item, ItemFilter, ItemId, NewItem};

const ITEM_COLUMNS: &str =
    "item_id, category, slot, asset_id, name, rarity, price_points, unlock_level";

// =============================================================================
// Shared Queries
// =============================================================================

pub(crate) async fn fetch_item<'e, E>(executor: E, item_id: ItemId) -> DbResult<Option<Item>>
where
    E: SqliteExecutor<'e>,
{
    let item = sqlx::query_as::<_, Item>(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE item_id = ?1"
    ))
    .bind(item_id)
    .fetch_optional(executor)
    .await?;

    Ok(item)
}

pub(crate) async fn items_unlocked_at<'e, E>(executor: E, level: i64) -> DbResult<Vec<Item>>
where
    E: SqliteExecutor<'e>,
{
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE unlock_level = ?1 ORDER BY item_id"
    ))
    .bind(level)
    .fetch_all(executor)
    .await?;

    Ok(items)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Adds an item to the catalog.
    pub async fn create(&self, item: NewItem) -> DbResult<Item> {
        let item = validate_new_item(item)?;

        let created = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (category, slot, asset_id, name, rarity, price_points, unlock_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item.category)
        .bind(item.slot)
        .bind(item.asset_id)
        .bind(item.name)
        .bind(item.rarity)
        .bind(item.price_points)
        .bind(item.unlock_level)
        .fetch_one(&self.pool)
        .await?;

        info!(item_id = created.item_id, name = %created.name, "Catalog item created");
        Ok(created)
    }

    pub async fn get_by_id(&self, item_id: ItemId) -> DbResult<Option<Item>> {
        fetch_item(&self.pool, item_id).await
    }

    /// Lists the catalog, rarest last, then by name.
    pub async fn list(&self, filter: ItemFilter) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items
             WHERE (?1 IS NULL OR category = ?1)
               AND (?2 IS NULL OR rarity = ?2)
               AND (?3 IS NULL OR slot = ?3)
             ORDER BY CASE rarity
                        WHEN 'COMMON' THEN 0
                        WHEN 'RARE' THEN 1
                        WHEN 'EPIC' THEN 2
                        ELSE 3
                      END,
                      name"
        ))
        .bind(filter.category)
        .bind(filter.rarity)
        .bind(filter.slot)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), ?filter, "Listed catalog items");
        Ok(items)
    }

    /// Items that unlock exactly at `level`.
    pub async fn unlocks_for_level(&self, level: i64) -> DbResult<Vec<Item>> {
        items_unlocked_at(&self.pool, level).await
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
