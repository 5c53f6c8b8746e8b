//! # Repository Module
//!
//! Database repository implementations for the Pointlings backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Ways Into the Same SQL                           │
//! │                                                                         │
//! │  HTTP handler                       Engine (pointlings-core)           │
//! │       │                                   │                             │
//! │       │ db.users().create_user(..)        │ tx.debit_balance(..)        │
//! │       ▼                                   ▼                             │
//! │  UserRepository (holds SqlitePool)   SqliteTx (holds a Transaction)    │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │        users::debit_balance(executor, ..)                              │
//! │        free functions generic over SqliteExecutor                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories run single statements against the pool. Multi-step
//! workflows go through [`SqliteStore`](crate::SqliteStore) so every step
//! shares one transaction.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`] - Accounts and point balances
//! - [`PointlingRepository`] - Pets, nicknames, appearance
//! - [`ItemRepository`] - Catalog
//! - [`InventoryRepository`] - Ownership edges and equip state
//! - [`XpEventRepository`] - XP history
//! - [`PointSpendRepository`] - Purchase history

pub mod inventory;
pub mod items;
pub mod point_spends;
pub mod pointlings;
pub mod users;
pub mod xp_events;

pub use inventory::InventoryRepository;
pub use items::ItemRepository;
pub use point_spends::PointSpendRepository;
pub use pointlings::PointlingRepository;
pub use users::UserRepository;
pub use xp_events::XpEventRepository;
