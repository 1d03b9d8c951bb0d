//! Process-wide database connection cache.
//!
//! One `ConnectionCache` is built at startup and handed to the store that
//! needs it. The first `get_connection` call starts a connect attempt;
//! every caller arriving while it runs awaits that same attempt and sees
//! the same outcome. A failed attempt clears the cache so the next call
//! tries again. Once a connection is cached it is reused for the life of
//! the process.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use rusqlite::Connection;
use thiserror::Error;

use super::sqlite::{open_database, open_memory_database};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Cannot reach patient database at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },
}

/// Opens new connections to one fixed endpoint.
pub trait Connector: Send + Sync + 'static {
    type Connection: Clone + Send + Sync + 'static;

    /// Human-readable endpoint, for logs and errors.
    fn endpoint(&self) -> String;

    fn connect(&self) -> impl Future<Output = Result<Self::Connection, ConnectionError>> + Send;
}

type ConnectAttempt<T> = Shared<BoxFuture<'static, Result<T, ConnectionError>>>;

enum CacheState<T> {
    Uninitialized,
    Connecting(ConnectAttempt<T>),
    Connected(T),
}

/// Lazily connected, single-flight connection handle.
pub struct ConnectionCache<C: Connector> {
    connector: Arc<C>,
    state: Mutex<CacheState<C::Connection>>,
}

impl<C: Connector> ConnectionCache<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            state: Mutex::new(CacheState::Uninitialized),
        }
    }

    /// Return the cached connection, connecting on first use.
    pub async fn get_connection(&self) -> Result<C::Connection, ConnectionError> {
        let attempt = {
            let mut state = self.lock_state();
            match &*state {
                CacheState::Connected(conn) => {
                    tracing::debug!("Using existing database connection");
                    return Ok(conn.clone());
                }
                CacheState::Connecting(attempt) => attempt.clone(),
                CacheState::Uninitialized => {
                    let attempt = self.start_attempt();
                    *state = CacheState::Connecting(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        let mut state = self.lock_state();
        // Only the attempt that is still current may settle the state.
        if matches!(&*state, CacheState::Connecting(current) if current.ptr_eq(&attempt)) {
            *state = match &result {
                Ok(conn) => CacheState::Connected(conn.clone()),
                Err(_) => CacheState::Uninitialized,
            };
        }
        result
    }

    /// Whether a live connection is cached.
    pub fn is_connected(&self) -> bool {
        matches!(&*self.lock_state(), CacheState::Connected(_))
    }

    fn start_attempt(&self) -> ConnectAttempt<C::Connection> {
        let connector = Arc::clone(&self.connector);
        async move {
            let endpoint = connector.endpoint();
            tracing::info!(%endpoint, "Creating new database connection");
            match connector.connect().await {
                Ok(conn) => {
                    tracing::info!(%endpoint, "Connected to patient database");
                    Ok(conn)
                }
                Err(e) => {
                    tracing::error!(%endpoint, error = %e, "Database connection failed; next call will retry");
                    Err(e)
                }
            }
        }
        .boxed()
        .shared()
    }

    // Every transition is a single assignment, so a poisoned guard still
    // holds a coherent state.
    fn lock_state(&self) -> MutexGuard<'_, CacheState<C::Connection>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A SQLite connection shared by every store operation.
pub type SharedConnection = Arc<Mutex<Connection>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteEndpoint {
    File(PathBuf),
    Memory,
}

/// Opens the SQLite patient database and applies migrations.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    endpoint: SqliteEndpoint,
}

impl SqliteConnector {
    pub fn new(endpoint: SqliteEndpoint) -> Self {
        Self { endpoint }
    }
}

impl Connector for SqliteConnector {
    type Connection = SharedConnection;

    fn endpoint(&self) -> String {
        match &self.endpoint {
            SqliteEndpoint::File(path) => path.display().to_string(),
            SqliteEndpoint::Memory => ":memory:".to_string(),
        }
    }

    fn connect(&self) -> impl Future<Output = Result<SharedConnection, ConnectionError>> + Send {
        let endpoint = self.endpoint.clone();
        let label = self.endpoint();
        async move {
            let opened = tokio::task::spawn_blocking(move || match endpoint {
                SqliteEndpoint::File(path) => open_database(&path),
                SqliteEndpoint::Memory => open_memory_database(),
            })
            .await
            .map_err(|e| ConnectionError::Unreachable {
                endpoint: label.clone(),
                reason: e.to_string(),
            })?;

            let conn = opened.map_err(|e| ConnectionError::Unreachable {
                endpoint: label,
                reason: e.to_string(),
            })?;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }
}
