//! # XP Engine
//!
//! Grants experience to a pointling under per-action and daily caps and
//! advances its level.
//!
//! ## Grant Flow
//! ```text
//! grant_xp(pointling, RECEIPT, 10)
//!      │
//!      ├── amount outside 1..=10 ──────────────► Validation
//!      ├── pointling missing ──────────────────► NotFound
//!      │
//!      ▼ BEGIN
//! lock pointling row
//!      │
//! sum(RECEIPT today) + 10 > 50 ? ─── yes ─────► DailyLimitExceeded (ROLLBACK)
//!      │ no
//!      ▼
//! insert xp_event ─► apply XP ─► update level/xp/required
//!      │
//!      ▼ COMMIT
//! XpGrant { leveled_up, new_level, unlocked_items, .. }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::store::{Store, StoreTx};
use crate::types::{Item, NewXpEvent, PointlingId, XpEvent, XpSource};
use crate::validation::validate_xp_amount;

/// Outcome of a successful grant.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct XpGrant {
    pub pointling_id: PointlingId,
    pub xp_gained: i64,
    /// Cumulative XP after the grant.
    pub new_total: i64,
    pub leveled_up: bool,
    /// Set only when `leveled_up`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<i64>,
    /// Threshold after the grant.
    pub required_xp: i64,
    pub event: XpEvent,
    /// Catalog items gated at the level just reached.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unlocked_items: Vec<Item>,
}

/// XP and leveling workflow.
#[derive(Debug, Clone)]
pub struct XpEngine<S> {
    store: S,
}

impl<S: Store> XpEngine<S> {
    pub fn new(store: S) -> Self {
        XpEngine { store }
    }

    /// Grants `amount` XP from `source` at the current time.
    pub async fn grant_xp(
        &self,
        pointling_id: PointlingId,
        source: XpSource,
        amount: i64,
    ) -> CoreResult<XpGrant> {
        self.grant_xp_at(pointling_id, source, amount, Utc::now())
            .await
    }

    /// Grants XP as of `now`. The daily window is `now`'s UTC calendar day.
    pub async fn grant_xp_at(
        &self,
        pointling_id: PointlingId,
        source: XpSource,
        amount: i64,
        now: DateTime<Utc>,
    ) -> CoreResult<XpGrant> {
        validate_xp_amount(source, amount)?;

        if self.store.find_pointling(pointling_id).await?.is_none() {
            return Err(CoreError::not_found("Pointling", pointling_id));
        }

        let mut tx = self.store.begin().await?;

        let pointling = tx
            .lock_pointling(pointling_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Pointling", pointling_id))?;

        let cap = source.daily_cap();
        let granted_today = tx
            .xp_granted_on(pointling_id, source, now.date_naive())
            .await?;

        if granted_today + amount > cap {
            debug!(
                pointling_id,
                source = %source,
                granted_today,
                amount,
                "XP grant rejected by daily cap"
            );
            return Err(CoreError::DailyLimitExceeded {
                xp_source: source,
                granted_today,
                requested: amount,
                cap,
            });
        }

        let event = tx
            .insert_xp_event(NewXpEvent {
                pointling_id,
                source,
                xp_amount: amount,
                event_ts: now,
            })
            .await?;

        let outcome = pointling.progress().apply(amount);
        tx.update_progress(pointling_id, outcome.progress).await?;
        tx.commit().await?;

        let progress = outcome.progress;
        info!(
            pointling_id,
            source = %source,
            amount,
            level = progress.level,
            leveled_up = outcome.leveled_up,
            "XP granted"
        );

        let unlocked_items = if outcome.leveled_up {
            // the grant is already committed; a failed lookup only empties the list
            match self.store.unlocks_for_level(progress.level).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(pointling_id, level = progress.level, error = %e, "Unlock lookup failed");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(XpGrant {
            pointling_id,
            xp_gained: amount,
            new_total: progress.current_xp,
            leveled_up: outcome.leveled_up,
            new_level: outcome.leveled_up.then_some(progress.level),
            required_xp: progress.required_xp,
            event,
            unlocked_items,
        })
    }
}
