//! # Storage Ports
//!
//! The traits the engines are written against. `pointlings-db` provides the
//! SQLite implementation; tests can provide their own.
//!
//! ## Transaction Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  let mut tx = store.begin().await?;        ◄── BEGIN                   │
//! │                                                                         │
//! │  tx.lock_pointling(id).await?;             ◄── first statement writes, │
//! │  tx.insert_xp_event(..).await?;                taking the write lock   │
//! │  tx.update_progress(..).await?;                                         │
//! │        │                                                                │
//! │        ├── any `?` returns early ──► tx dropped ──► ROLLBACK           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  tx.commit().await?;                       ◄── COMMIT (last await)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A transaction that is dropped without [`StoreTx::commit`] rolls back.
//! That covers early returns, cancelled request futures and panics alike.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CoreResult;
use crate::leveling::XpProgress;
use crate::types::{
    Item, ItemId, NewPointSpend, NewXpEvent, Pointling, PointlingId, PointlingItem, PointSpend,
    User, UserId, XpEvent, XpSource,
};

/// Non-transactional reads plus the transaction factory.
#[async_trait]
pub trait Store: Send + Sync {
    /// Transaction handle type.
    type Tx: StoreTx;

    /// Opens a transaction.
    async fn begin(&self) -> CoreResult<Self::Tx>;

    async fn find_user(&self, user_id: UserId) -> CoreResult<Option<User>>;

    async fn find_pointling(&self, pointling_id: PointlingId) -> CoreResult<Option<Pointling>>;

    async fn find_item(&self, item_id: ItemId) -> CoreResult<Option<Item>>;

    /// Catalog items whose unlock level is exactly `level`.
    async fn unlocks_for_level(&self, level: i64) -> CoreResult<Vec<Item>>;
}

/// Row operations available inside one transaction.
#[async_trait]
pub trait StoreTx: Send {
    /// Takes the write lock on a pointling row and returns its current state.
    ///
    /// `None` when the pointling does not exist.
    async fn lock_pointling(&mut self, pointling_id: PointlingId) -> CoreResult<Option<Pointling>>;

    /// XP granted to a pointling from `source` on the given UTC day.
    async fn xp_granted_on(
        &mut self,
        pointling_id: PointlingId,
        source: XpSource,
        day: NaiveDate,
    ) -> CoreResult<i64>;

    async fn insert_xp_event(&mut self, event: NewXpEvent) -> CoreResult<XpEvent>;

    /// Persists level, cumulative XP and threshold together.
    async fn update_progress(
        &mut self,
        pointling_id: PointlingId,
        progress: XpProgress,
    ) -> CoreResult<()>;

    /// Subtracts `amount` only if the balance covers it.
    ///
    /// Returns the new balance, or `None` when the user could not afford it.
    async fn debit_balance(&mut self, user_id: UserId, amount: i64) -> CoreResult<Option<i64>>;

    /// Inserts an ownership edge. Returns `false` if it already existed.
    async fn grant_item(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
        acquired_at: DateTime<Utc>,
    ) -> CoreResult<bool>;

    async fn insert_point_spend(&mut self, spend: NewPointSpend) -> CoreResult<PointSpend>;

    /// Lifetime points spent by a user, including rows written in this
    /// transaction.
    async fn total_spent_by_user(&mut self, user_id: UserId) -> CoreResult<i64>;

    /// Unequips every other equipped item the pointling owns in the same slot
    /// as `item_id`. A slotless item has no siblings.
    ///
    /// Returns the number of items unequipped.
    async fn unequip_slot_siblings(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
    ) -> CoreResult<u64>;

    /// Sets the equipped flag on an ownership edge.
    ///
    /// `None` when the pointling does not own the item.
    async fn set_equipped(
        &mut self,
        pointling_id: PointlingId,
        item_id: ItemId,
        equipped: bool,
    ) -> CoreResult<Option<PointlingItem>>;

    async fn commit(self) -> CoreResult<()>;

    async fn rollback(self) -> CoreResult<()>;
}
