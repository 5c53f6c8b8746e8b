//! # pointlings-core: Domain Logic for the Pointlings Backend
//!
//! Users earn points, raise a virtual pet (a *pointling*) that gains XP and
//! levels up, and spend points on cosmetic items for it. This crate holds
//! every rule that governs those state changes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pointlings Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │   bind request ──► call engine / repository ──► map error       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ pointlings-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ leveling  │  │  engine   │  │ validation│  │   │
//! │  │   │ Pointling │  │ XpProgress│  │ XpEngine  │  │   rules   │  │   │
//! │  │   │   Item    │  │ thresholds│  │ Commerce  │  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  │ Inventory │  └───────────┘  │   │
//! │  │                                 └─────┬─────┘                  │   │
//! │  │                           store::{Store, StoreTx} (ports)      │   │
//! │  └─────────────────────────────────────┬───────────────────────────┘   │
//! │                                        │ implemented by                 │
//! │  ┌─────────────────────────────────────▼───────────────────────────┐   │
//! │  │              pointlings-db (SQLite, sqlx)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Pointling, Item, XpEvent, ...)
//! - [`leveling`] - XP threshold curve and level-up arithmetic
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Input rules checked before any transaction
//! - [`store`] - Storage ports the engines run against
//! - [`engine`] - The transactional workflows
//!
//! ## Example Usage
//!
//! ```rust
//! use pointlings_core::leveling::XpProgress;
//!
//! let fresh = XpProgress::initial();
//! let outcome = fresh.apply(10);
//!
//! assert!(outcome.leveled_up);
//! assert_eq!(outcome.progress.level, 2);
//! assert_eq!(outcome.progress.required_xp, 6);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod leveling;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{CommerceEngine, InventoryEngine, Purchase, XpEngine, XpGrant};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use leveling::XpProgress;
pub use store::{Store, StoreTx};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest accepted display name, in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 100;

/// Longest accepted nickname, in characters.
pub const MAX_NICKNAME_LEN: usize = 32;

/// History page size when the caller gives none.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Largest history page a caller may request.
pub const MAX_HISTORY_LIMIT: i64 = 100;
