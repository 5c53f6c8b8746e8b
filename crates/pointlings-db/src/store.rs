//! # SQLite Store
//!
//! [`Store`]/[`StoreTx`] implementation the engines run against.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN (deferred)                                                       │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  first statement is a write ─────► RESERVED lock taken                  │
//! │    │                               competing writers wait here          │
//! │    │                               (busy_timeout), then see our commit  │
//! │    ▼                                                                    │
//! │  reads and writes of the workflow                                       │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT  or  drop ──► ROLLBACK                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The XP and unlock workflows open with [`StoreTx::lock_pointling`], the
//! purchase with the conditional debit, the equip toggle with its UPDATEs.
//! Only one writer holds the lock at a time, so no workflow ever acts on a
//! stale read.
//!
//! Inside a transaction every query goes through the transaction's own
//! connection, never the pool.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, error};

use crate::error::DbError;
use crate::repository::{inventory, items, point_spends, pointlings, users, xp_events};
use pointlings_core::{
    CoreResult, Item, ItemId, NewPointSpend, NewXpEvent, Pointling, PointlingId, PointlingItem,
    PointSpend, Store, StoreTx, User, UserId, XpEvent, XpProgress, XpSource,
};

/// Pool-backed store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }
}

/// One open SQLite transaction. Rolls back on drop unless committed.
pub struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

fn storage_fault(err: impl Into<DbError>) -> DbError {
    let err = err.into();
    error!(error = %err, "Storage fault inside transaction");
    err
}

#[async_trait]
impl Store for SqliteStore {
    type Tx = SqliteTx;

    async fn begin(&self) -> CoreResult<SqliteTx> {
        let tx = self.pool.begin().await.map_err(storage_fault)?;
        debug!("Transaction started");
        Ok(SqliteTx { tx })
    }

    async fn find_user(&self, user_id: UserId) -> CoreResult<Option<User>> {
        Ok(users::fetch_user(&self.pool, user_id).await?)
    }

    async fn find_pointling(&self, pointling_id: PointlingId) -> CoreResult<Option<Pointling>> {
        Ok(pointlings::fetch_pointling(&self.pool, pointling_id).await?)
    }

    async fn find_item(&self, item_id: ItemId) -> CoreResult<Option<Item>> {
        Ok(items::fetch_item(&self.pool, item_id).await?)
    }

    async fn unlocks_for_level(&self, level: i64) -> CoreResult<Vec<Item>> {
        Ok(items::items_unlocked_at(&self.pool, level).await?)
    }
}

#[async_trait]
impl StoreTx for SqliteTx {
    async fn lock_pointling(&mut self, pointling_id: PointlingId) -> CoreResult<Option<Pointling>> {
        Ok(pointlings::lock_pointling(&mut *self.tx, pointling_id).await?)
    }

    async fn xp_granted_on(
        &mut self,
        pointling_id: PointlingId,
        source: XpSource,
        day: NaiveDate,
    ) -> CoreResult<i64> {
        Ok(xp_events::xp_granted_on(&mut *self.tx, pointling_id, source, day).await?)
    }

    async fn insert_xp_event(&mut self, event: NewXpEvent) -> CoreResult<XpEvent> {
        Ok(xp_events::insert_event(&mut *self.tx, event)
            .await
            .map_err(storage_fault)?)
    }

    async fn update_progress(
        &mut self,
        pointling_id: PointlingId,
        progress: XpProgress,
    ) -> CoreResult<()> {
        Ok(pointlings::update_progress(&mut *self.tx, pointling_id, progress).await?)
    }

    async fn debit_balance(&mut self, user_id: UserId, amount: i64) -> CoreResult<Option<i64>> {
        Ok(users::debit_balance(&mut *self.tx, user_id, amount).await?)
    }

    async fn grant_item(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
        acquired_at: DateTime<Utc>,
    ) -> CoreResult<bool> {
        Ok(inventory::insert_edge(&mut *self.tx, pointling_id, item_id, acquired_at).await?)
    }

    async fn insert_point_spend(&mut self, spend: NewPointSpend) -> CoreResult<PointSpend> {
        Ok(point_spends::insert_spend(&mut *self.tx, spend)
            .await
            .map_err(storage_fault)?)
    }

    async fn total_spent_by_user(&mut self, user_id: UserId) -> CoreResult<i64> {
        Ok(point_spends::total_spent_by_user(&mut *self.tx, user_id).await?)
    }

    async fn unequip_slot_siblings(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
    ) -> CoreResult<u64> {
        Ok(inventory::unequip_slot_siblings(&mut *self.tx, pointling_id, item_id).await?)
    }

    async fn set_equipped(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
        equipped: bool,
    ) -> CoreResult<Option<PointlingItem>> {
        let updated = inventory::set_equipped(&mut *self.tx, pointling_id, item_id, equipped).await?;
        if updated == 0 {
            return Ok(None);
        }
        Ok(inventory::fetch_owned_item(&mut *self.tx, pointling_id, item_id).await?)
    }

    async fn commit(self) -> CoreResult<()> {
        self.tx.commit().await.map_err(storage_fault)?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(self) -> CoreResult<()> {
        self.tx.rollback().await.map_err(storage_fault)?;
        debug!("Transaction rolled back");
        Ok(())
    }
}
