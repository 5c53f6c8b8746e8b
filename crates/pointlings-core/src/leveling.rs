//! # Leveling Module
//!
//! Pure XP and level arithmetic. No storage, no clocks.
//!
//! ## Threshold Curve
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  required_xp(level) = min(3 + (level - 1) × 3, 120)                     │
//! │                                                                         │
//! │  level:        1    2    3    4   ...   40   41   42 ...               │
//! │  required_xp:  3    6    9   12   ...  120  120  120 ...               │
//! │                                                                         │
//! │  current_xp is cumulative and never reset on level-up.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Level Per Grant
//! A grant that overshoots the threshold by any margin still advances a
//! single level. The next grant re-checks against the new threshold.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Level every new pointling starts at.
pub const STARTING_LEVEL: i64 = 1;

/// Step added to the threshold per level.
pub const REQUIRED_XP_STEP: i64 = 3;

/// Ceiling for the threshold.
pub const REQUIRED_XP_CAP: i64 = 120;

/// Threshold a pointling at `level` must reach to advance.
///
/// ## Example
/// ```rust
/// use pointlings_core::leveling::required_xp_for_level;
///
/// assert_eq!(required_xp_for_level(1), 3);
/// assert_eq!(required_xp_for_level(2), 6);
/// assert_eq!(required_xp_for_level(500), 120);
/// ```
pub fn required_xp_for_level(level: i64) -> i64 {
    let steps = level.max(STARTING_LEVEL) - 1;
    steps
        .saturating_mul(REQUIRED_XP_STEP)
        .saturating_add(REQUIRED_XP_STEP)
        .min(REQUIRED_XP_CAP)
}

/// Leveling state of a pointling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct XpProgress {
    pub level: i64,
    pub current_xp: i64,
    pub required_xp: i64,
}

impl XpProgress {
    /// State of a freshly created pointling.
    pub const fn initial() -> Self {
        XpProgress {
            level: STARTING_LEVEL,
            current_xp: 0,
            required_xp: REQUIRED_XP_STEP,
        }
    }

    /// Applies `amount` XP and returns the resulting state.
    ///
    /// ```text
    /// before: L=1 X=0 R=3      amount=10
    ///            │
    ///            ▼  0 + 10 ≥ 3
    /// after:  L=2 X=10 R=6     leveled_up = true
    /// ```
    pub fn apply(self, amount: i64) -> LevelOutcome {
        let new_total = self.current_xp.saturating_add(amount);

        if new_total >= self.required_xp {
            let level = self.level + 1;
            LevelOutcome {
                progress: XpProgress {
                    level,
                    current_xp: new_total,
                    required_xp: required_xp_for_level(level),
                },
                leveled_up: true,
            }
        } else {
            LevelOutcome {
                progress: XpProgress {
                    current_xp: new_total,
                    ..self
                },
                leveled_up: false,
            }
        }
    }
}

/// Result of [`XpProgress::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub progress: XpProgress,
    pub leveled_up: bool,
}
