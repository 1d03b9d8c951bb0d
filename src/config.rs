use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MediCloud";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the storage connection string (required).
pub const DATABASE_URL_VAR: &str = "MEDICLOUD_DATABASE_URL";

/// Environment variable holding the HTTP bind address (optional).
pub const BIND_ADDR_VAR: &str = "MEDICLOUD_BIND_ADDR";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9002";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medicloud=info,medicloud_lib=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MEDICLOUD_DATABASE_URL is not set; define the patient storage connection string")]
    MissingDatabaseUrl,

    #[error("Unsupported storage connection string: {0}")]
    UnsupportedUrl(String),

    #[error("Invalid bind address {value}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Where patient documents live, parsed from the connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// `sqlite://<path>`: on-disk document database.
    Sqlite(PathBuf),
    /// `sqlite::memory:`: process-local document database.
    SqliteMemory,
    /// `file://<path>`: single JSON array file.
    JsonFile(PathBuf),
}

impl StorageTarget {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url == "sqlite::memory:" {
            return Ok(Self::SqliteMemory);
        }
        if let Some(path) = url.strip_prefix("sqlite://") {
            if path.is_empty() {
                return Err(ConfigError::UnsupportedUrl(url.to_string()));
            }
            return Ok(Self::Sqlite(PathBuf::from(path)));
        }
        if let Some(path) = url.strip_prefix("file://") {
            if path.is_empty() {
                return Err(ConfigError::UnsupportedUrl(url.to_string()));
            }
            return Ok(Self::JsonFile(PathBuf::from(path)));
        }
        Err(ConfigError::UnsupportedUrl(url.to_string()))
    }
}

/// Process configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageTarget,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        let storage = StorageTarget::parse(&url)?;

        let bind = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { storage, bind_addr })
    }
}
