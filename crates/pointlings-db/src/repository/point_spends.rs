//! # Point Spend Repository
//!
//! The append-only purchase log.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::DbResult;
use pointlings_core::{NewPointSpend, Page, PointSpend, SpendHistoryEntry, UserId};

const SPEND_COLUMNS: &str = "spend_id, user_id, item_id, points_spent, spend_ts";

pub(crate) async fn insert_spend<'e, E>(executor: E, spend: NewPointSpend) -> DbResult<PointSpend>
where
    E: SqliteExecutor<'e>,
{
    let spend = sqlx::query_as::<_, PointSpend>(&format!(
        "INSERT INTO point_spend (user_id, item_id, points_spent, spend_ts)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING {SPEND_COLUMNS}"
    ))
    .bind(spend.user_id)
    .bind(spend.item_id)
    .bind(spend.points_spent)
    .bind(spend.spend_ts)
    .fetch_one(executor)
    .await?;

    Ok(spend)
}

pub(crate) async fn total_spent_by_user<'e, E>(executor: E, user_id: UserId) -> DbResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points_spent), 0) FROM point_spend WHERE user_id = ?1",
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(total)
}

/// Read access to purchase history.
#[derive(Debug, Clone)]
pub struct PointSpendRepository {
    pool: SqlitePool,
}

impl PointSpendRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PointSpendRepository { pool }
    }

    /// A user's purchases with the bought item, newest first.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> DbResult<Vec<SpendHistoryEntry>> {
        let entries = sqlx::query_as::<_, SpendHistoryEntry>(
            r#"
            SELECT ps.spend_id, ps.user_id, ps.item_id, ps.points_spent, ps.spend_ts,
                   i.category, i.slot, i.asset_id, i.name, i.rarity, i.price_points, i.unlock_level
            FROM point_spend ps
            JOIN items i ON i.item_id = ps.item_id
            WHERE ps.user_id = ?1
            ORDER BY ps.spend_ts DESC, ps.spend_id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Lifetime points spent.
    pub async fn total_spent_by_user(&self, user_id: UserId) -> DbResult<i64> {
        total_spent_by_user(&self.pool, user_id).await
    }
}
