//! # Commerce Engine
//!
//! Point purchases and level unlocks. Both end in the same
//! conflict-detecting insert of an ownership edge.
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  spend_points(user, item, pointling)                                    │
//! │                                                                         │
//! │  item exists? priced? user exists? pointling exists and is user's?     │
//! │       │ (checked before BEGIN, nothing written)                         │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  UPDATE balance - price WHERE balance >= price ── 0 rows ──► Insufficient│
//! │       │                                                                 │
//! │  INSERT ownership edge ───────────────── conflict ──► AlreadyOwned      │
//! │       │                                    (debit rolled back)          │
//! │  INSERT point_spend                                                     │
//! │  SUM lifetime spend                                                     │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::store::{Store, StoreTx};
use crate::types::{ItemId, NewPointSpend, PointlingId, PointlingItem, UserId};

/// Outcome of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Purchase {
    pub item_id: ItemId,
    pub pointling_id: PointlingId,
    pub points_spent: i64,
    /// Balance after the debit.
    pub new_balance: i64,
    /// Everything this user has ever spent, this purchase included.
    pub lifetime_spent: i64,
}

/// Purchase and unlock workflows.
#[derive(Debug, Clone)]
pub struct CommerceEngine<S> {
    store: S,
}

impl<S: Store> CommerceEngine<S> {
    pub fn new(store: S) -> Self {
        CommerceEngine { store }
    }

    /// Buys `item_id` for `pointling_id` with `user_id`'s points.
    pub async fn spend_points(
        &self,
        user_id: UserId,
        item_id: ItemId,
        pointling_id: PointlingId,
    ) -> CoreResult<Purchase> {
        let item = self
            .store
            .find_item(item_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Item", item_id))?;

        let price = item
            .price()
            .ok_or(ValidationError::NotPurchasable { item_id })?;

        if self.store.find_user(user_id).await?.is_none() {
            return Err(CoreError::not_found("User", user_id));
        }

        let pointling = self
            .store
            .find_pointling(pointling_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Pointling", pointling_id))?;

        if pointling.user_id != user_id {
            return Err(ValidationError::ForeignPointling {
                pointling_id,
                user_id,
            }
            .into());
        }

        let mut tx = self.store.begin().await?;

        let Some(new_balance) = tx.debit_balance(user_id, price).await? else {
            debug!(user_id, item_id, price, "Purchase rejected: insufficient balance");
            return Err(CoreError::InsufficientBalance { user_id, price });
        };

        let now = Utc::now();
        if !tx.grant_item(pointling_id, item_id, now).await? {
            debug!(pointling_id, item_id, "Purchase rejected: already owned");
            return Err(CoreError::AlreadyOwned {
                pointling_id,
                item_id,
            });
        }

        tx.insert_point_spend(NewPointSpend {
            user_id,
            item_id,
            points_spent: price,
            spend_ts: now,
        })
        .await?;

        let lifetime_spent = tx.total_spent_by_user(user_id).await?;
        tx.commit().await?;

        info!(user_id, pointling_id, item_id, price, new_balance, "Item purchased");

        Ok(Purchase {
            item_id,
            pointling_id,
            points_spent: price,
            new_balance,
            lifetime_spent,
        })
    }

    /// Grants an item without payment once the pointling reaches its unlock
    /// level. Items with no unlock level are always acquirable.
    pub async fn acquire_item(
        &self,
        pointling_id: PointlingId,
        item_id: ItemId,
    ) -> CoreResult<PointlingItem> {
        let item = self
            .store
            .find_item(item_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Item", item_id))?;

        let mut tx = self.store.begin().await?;

        let pointling = tx
            .lock_pointling(pointling_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Pointling", pointling_id))?;

        if !item.is_unlocked_at(pointling.level) {
            return Err(CoreError::LevelRequirementNotMet {
                item_id,
                required_level: item.unlock_level.unwrap_or_default(),
                current_level: pointling.level,
            });
        }

        let acquired_at = Utc::now();
        if !tx.grant_item(pointling_id, item_id, acquired_at).await? {
            return Err(CoreError::AlreadyOwned {
                pointling_id,
                item_id,
            });
        }

        tx.commit().await?;
        info!(pointling_id, item_id, "Item unlocked");

        Ok(PointlingItem {
            pointling_id,
            item_id,
            acquired_at,
            equipped: false,
            item,
        })
    }
}
