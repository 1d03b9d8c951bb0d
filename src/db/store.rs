//! Patient Store: read-all with backfill, write-all by full replacement.
//!
//! Callers see two sanitized failures, `Read` and `Write`. The underlying
//! cause is logged here and kept as the error source, never shown in the
//! message.

use std::sync::Arc;

use thiserror::Error;

use super::connection::{ConnectionCache, SqliteConnector, SqliteEndpoint};
use super::document_store::DocumentStore;
use super::file_store::FileStore;
use super::DatabaseError;
use crate::backfill::normalize_patients;
use crate::config::StorageTarget;
use crate::models::{Patient, StoredPatient};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not read patient data.")]
    Read(#[source] DatabaseError),

    #[error("Could not save patient data.")]
    Write(#[source] DatabaseError),
}

/// Interchangeable storage behind the store contract.
#[derive(Clone)]
pub enum StorageBackend {
    Database(DocumentStore),
    File(FileStore),
}

impl StorageBackend {
    async fn load_all(&self) -> Result<Vec<StoredPatient>, DatabaseError> {
        match self {
            Self::Database(store) => store.load_all().await,
            Self::File(store) => store.load_all().await,
        }
    }

    async fn replace_all(&self, patients: Vec<Patient>) -> Result<usize, DatabaseError> {
        match self {
            Self::Database(store) => store.replace_all(patients).await,
            Self::File(store) => store.replace_all(patients).await,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "sqlite",
            Self::File(_) => "json-file",
        }
    }
}

#[derive(Clone)]
pub struct PatientStore {
    backend: StorageBackend,
}

impl PatientStore {
    pub fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }

    /// Build the store for a configured target. Nothing connects until
    /// the first read or write.
    pub fn from_target(target: &StorageTarget) -> Self {
        let backend = match target {
            StorageTarget::Sqlite(path) => database_backend(SqliteEndpoint::File(path.clone())),
            StorageTarget::SqliteMemory => database_backend(SqliteEndpoint::Memory),
            StorageTarget::JsonFile(path) => StorageBackend::File(FileStore::new(path.clone())),
        };
        Self::new(backend)
    }

    /// All patients, each with missing fields backfilled. Storage is not
    /// modified.
    pub async fn get_patients(&self) -> Result<Vec<Patient>, StoreError> {
        tracing::info!(backend = self.backend.kind(), "Fetching patients");
        let stored = self.backend.load_all().await.map_err(|e| {
            tracing::error!(error = %e, "Error fetching patients");
            StoreError::Read(e)
        })?;
        let patients = normalize_patients(stored);
        tracing::info!(count = patients.len(), "Retrieved patients");
        Ok(patients)
    }

    /// Replace the whole collection with `patients`.
    pub async fn save_patients(&self, patients: Vec<Patient>) -> Result<(), StoreError> {
        tracing::info!(
            backend = self.backend.kind(),
            count = patients.len(),
            "Saving patients"
        );
        let written = self.backend.replace_all(patients).await.map_err(|e| {
            tracing::error!(error = %e, "Error saving patients");
            StoreError::Write(e)
        })?;
        tracing::info!(count = written, "Saved patients");
        Ok(())
    }
}

fn database_backend(endpoint: SqliteEndpoint) -> StorageBackend {
    let connections = Arc::new(ConnectionCache::new(SqliteConnector::new(endpoint)));
    StorageBackend::Database(DocumentStore::new(connections))
}
