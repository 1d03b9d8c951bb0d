//! SQLite-backed patient document store.

use std::sync::Arc;

use rusqlite::Connection;

use super::connection::{ConnectionCache, SharedConnection, SqliteConnector};
use super::repository;
use super::DatabaseError;
use crate::models::{Patient, StoredPatient};

/// Patient documents in the SQLite database behind a shared connection cache.
#[derive(Clone)]
pub struct DocumentStore {
    connections: Arc<ConnectionCache<SqliteConnector>>,
}

impl DocumentStore {
    pub fn new(connections: Arc<ConnectionCache<SqliteConnector>>) -> Self {
        Self { connections }
    }

    pub async fn load_all(&self) -> Result<Vec<StoredPatient>, DatabaseError> {
        let conn = self.connections.get_connection().await?;
        with_connection(conn, |c| repository::load_patient_documents(c)).await
    }

    pub async fn replace_all(&self, patients: Vec<Patient>) -> Result<usize, DatabaseError> {
        let conn = self.connections.get_connection().await?;
        with_connection(conn, move |c| repository::replace_patient_documents(c, &patients)).await
    }
}

/// Run a blocking SQLite call on the blocking pool.
async fn with_connection<T, F>(conn: SharedConnection, f: F) -> Result<T, DatabaseError>
where
    F: FnOnce(&mut Connection) -> Result<T, DatabaseError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&mut guard)
    })
    .await
    .map_err(|e| DatabaseError::Task(e.to_string()))?
}
