//! # Pointlings API
//!
//! REST surface for the Pointlings backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Routes (/api/v1)                           │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  users         │  │  pointlings    │  │  items                     ││
//! │  │                │  │                │  │                            ││
//! │  │ • create/list  │  │ • create/get   │  │ • catalog list/create/get  ││
//! │  │ • points set   │  │ • nickname     │  │ • inventory                ││
//! │  │ • award/spend  │  │ • look         │  │ • acquire (unlock)         ││
//! │  │ • history      │  │ • xp, history  │  │ • equip toggle             ││
//! │  └───────┬────────┘  └───────┬────────┘  └─────────────┬──────────────┘│
//! │          │                   │                         │                │
//! │          ▼                   ▼                         ▼                │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState { db }                                                  │  │
//! │  │  engines for multi-step writes, repositories for the rest        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `POINTLINGS_CONFIG` - TOML config file path
//! - `POINTLINGS_DB_PATH` - SQLite database file
//! - `POINTLINGS_HOST` / `POINTLINGS_PORT` - listen address (default 0.0.0.0:8080)
//! - `POINTLINGS_MAX_CONNECTIONS` - pool size (default 5)

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;

use pointlings_db::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
