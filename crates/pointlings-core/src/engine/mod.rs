//! # Transactional Engines
//!
//! The three multi-step workflows of the backend. Each runs inside exactly
//! one store transaction and either commits every mutation or none.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  XpEngine          grant_xp        lock ─► cap check ─► event ─► level │
//! │  CommerceEngine    spend_points    debit ─► grant ─► spend log         │
//! │                    acquire_item    lock ─► level gate ─► grant         │
//! │  InventoryEngine   toggle_equipped unequip siblings ─► set flag        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Engines are generic over [`Store`](crate::store::Store) and hold no state
//! besides the store handle, so they are cheap to construct per request.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commerce;
pub mod inventory;
pub mod xp;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use commerce::{CommerceEngine, Purchase};
pub use inventory::InventoryEngine;
pub use xp::{XpEngine, XpGrant};
