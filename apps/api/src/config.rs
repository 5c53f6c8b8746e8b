//! # API Configuration
//!
//! Where the server listens and which database it opens.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     POINTLINGS_DB_PATH=/var/lib/pointlings/pointlings.db               │
//! │     POINTLINGS_PORT=9000                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $POINTLINGS_CONFIG, or                                             │
//! │     ~/.config/pointlings/api.toml (Linux)                              │
//! │     ~/Library/Application Support/com.pointlings.api/api.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:8080, ./pointlings.db                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! path = "pointlings.db"
//! max_connections = 5
//! ```

use std::path::{Path, PathBuf};

use pointlings_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Names of the environment overrides.
pub mod env {
    pub const CONFIG: &str = "POINTLINGS_CONFIG";
    pub const DB_PATH: &str = "POINTLINGS_DB_PATH";
    pub const HOST: &str = "POINTLINGS_HOST";
    pub const PORT: &str = "POINTLINGS_PORT";
    pub const MAX_CONNECTIONS: &str = "POINTLINGS_MAX_CONNECTIONS";
}

// =============================================================================
// Server Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// `host:port`, ready for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, created on first start.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("pointlings.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Main API Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`POINTLINGS_CONFIG` or the platform config dir)
    /// 3. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let path = lookup(env::CONFIG)
            .map(PathBuf::from)
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(lookup)?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file. Missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading API config from file");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Applies `POINTLINGS_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are rejected rather than ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(env::DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(host) = lookup(env::HOST) {
            self.server.host = host;
        }

        if let Some(port) = lookup(env::PORT) {
            self.server.port = parse_override(env::PORT, &port)?;
            debug!(port = self.server.port, "Overriding port from environment");
        }

        if let Some(max) = lookup(env::MAX_CONNECTIONS) {
            self.database.max_connections = parse_override(env::MAX_CONNECTIONS, &max)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("server.host".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue("database.max_connections".into()));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue("database.path".into()));
        }

        Ok(())
    }

    /// Pool settings for [`Database::new`](pointlings_db::Database::new).
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pointlings", "api")
            .map(|dirs| dirs.config_dir().join("api.toml"))
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
