//! # pointlings-db: Database Layer for the Pointlings Backend
//!
//! SQLite storage through sqlx: pool setup, embedded migrations, CRUD
//! repositories, and the transactional store behind the engines.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pointlings Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (apps/api)                                               │
//! │       │                          │                                      │
//! │       │ CRUD                     │ XpEngine / CommerceEngine /          │
//! │       │                          │ InventoryEngine (pointlings-core)    │
//! │       ▼                          ▼                                      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pointlings-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ users, items, │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ pointlings,.. │    │ 001_init.sql │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼───────┐                                             │   │
//! │  │   │  SqliteStore  │  Store / StoreTx ports, one tx per workflow │   │
//! │  │   └───────────────┘                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`store`] - Transactional store for the engines
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pointlings_core::{XpEngine, XpSource};
//! use pointlings_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("pointlings.db")).await?;
//!
//! let user = db.users().create_user("Mina", 0).await?;
//! let pet = db.pointlings().create(user.user_id, Some("Blip")).await?;
//!
//! let grant = XpEngine::new(db.store())
//!     .grant_xp(pet.pointling_id, XpSource::Receipt, 10)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{SqliteStore, SqliteTx};

// Repository re-exports for convenience
pub use repository::{
    InventoryRepository, ItemRepository, PointSpendRepository, PointlingRepository,
    UserRepository, XpEventRepository,
};
