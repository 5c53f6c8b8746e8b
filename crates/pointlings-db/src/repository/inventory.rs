//! # Inventory Repository
//!
//! Ownership edges between pointlings and catalog items.
//!
//! ## Slot Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pointling 7                                                            │
//! │                                                                         │
//! │   HAT    [Top Hat ✓] [Party Hat  ] [Crown  ]   ← at most one ✓ per slot │
//! │   SHOES  [Boots   ✓]                                                    │
//! │   —      [Spots   ✓] [Stripes  ✓]              ← slotless: unrestricted │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Equipping goes through [`InventoryEngine`](pointlings_core::InventoryEngine),
//! which unequips siblings and sets the flag in one transaction.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::DbResult;
use pointlings_core::{ItemId, ItemSlot, PointlingId, PointlingItem};

const OWNED_ITEM_SELECT: &str = r#"
    SELECT pi.pointling_id, pi.item_id, pi.acquired_at, pi.equipped,
           i.category, i.slot, i.asset_id, i.name, i.rarity, i.price_points, i.unlock_level
    FROM pointling_items pi
    JOIN items i ON i.item_id = pi.item_id
"#;

// =============================================================================
// Shared Queries
// =============================================================================

pub(crate) async fn fetch_owned_item<'e, E>(
    executor: E,
    pointling_id: PointlingId,
    item_id: ItemId,
) -> DbResult<Option<PointlingItem>>
where
    E: SqliteExecutor<'e>,
{
    let owned = sqlx::query_as::<_, PointlingItem>(&format!(
        "{OWNED_ITEM_SELECT} WHERE pi.pointling_id = ?1 AND pi.item_id = ?2"
    ))
    .bind(pointling_id)
    .bind(item_id)
    .fetch_optional(executor)
    .await?;

    Ok(owned)
}

/// Inserts an ownership edge; `false` when the pair already exists.
pub(crate) async fn insert_edge<'e, E>(
    executor: E,
    pointling_id: PointlingId,
    item_id: ItemId,
    acquired_at: DateTime<Utc>,
) -> DbResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO pointling_items (pointling_id, item_id, acquired_at, equipped)
        VALUES (?1, ?2, ?3, 0)
        ON CONFLICT (pointling_id, item_id) DO NOTHING
        "#,
    )
    .bind(pointling_id)
    .bind(item_id)
    .bind(acquired_at)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Unequips the pointling's other equipped items in `item_id`'s slot.
pub(crate) async fn unequip_slot_siblings<'e, E>(
    executor: E,
    pointling_id: PointlingId,
    item_id: ItemId,
) -> DbResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE pointling_items
        SET equipped = 0
        WHERE pointling_id = ?1
          AND item_id <> ?2
          AND equipped = 1
          AND item_id IN (
              SELECT sibling.item_id
              FROM items sibling
              JOIN items target ON target.item_id = ?2
              WHERE target.slot IS NOT NULL
                AND sibling.slot = target.slot
          )
        "#,
    )
    .bind(pointling_id)
    .bind(item_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Sets the equipped flag; returns rows affected (0 when not owned).
pub(crate) async fn set_equipped<'e, E>(
    executor: E,
    pointling_id: PointlingId,
    item_id: ItemId,
    equipped: bool,
) -> DbResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE pointling_items SET equipped = ?3 WHERE pointling_id = ?1 AND item_id = ?2",
    )
    .bind(pointling_id)
    .bind(item_id)
    .bind(equipped)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Repository
// =============================================================================

/// Read access to pointling inventories.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Owned items, newest first. `equipped` narrows to worn or stowed items.
    pub async fn list_for_pointling(
        &self,
        pointling_id: PointlingId,
        equipped: Option<bool>,
    ) -> DbResult<Vec<PointlingItem>> {
        let items = sqlx::query_as::<_, PointlingItem>(&format!(
            "{OWNED_ITEM_SELECT}
             WHERE pi.pointling_id = ?1 AND (?2 IS NULL OR pi.equipped = ?2)
             ORDER BY pi.acquired_at DESC, pi.item_id DESC"
        ))
        .bind(pointling_id)
        .bind(equipped)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// The item currently worn in `slot`, if any.
    pub async fn equipped_in_slot(
        &self,
        pointling_id: PointlingId,
        slot: ItemSlot,
    ) -> DbResult<Option<PointlingItem>> {
        let item = sqlx::query_as::<_, PointlingItem>(&format!(
            "{OWNED_ITEM_SELECT}
             WHERE pi.pointling_id = ?1 AND pi.equipped = 1 AND i.slot = ?2"
        ))
        .bind(pointling_id)
        .bind(slot)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn get(
        &self,
        pointling_id: PointlingId,
        item_id: ItemId,
    ) -> DbResult<Option<PointlingItem>> {
        fetch_owned_item(&self.pool, pointling_id, item_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
