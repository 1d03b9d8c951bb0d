//! Flat-file patient store: the whole collection as one JSON array.

use std::io::ErrorKind;
use std::path::PathBuf;

use super::DatabaseError;
use crate::models::{Patient, StoredPatient};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file reads as an empty collection.
    pub async fn load_all(&self) -> Result<Vec<StoredPatient>, DatabaseError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Patient file absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrite the file with `patients`. Written to a sibling temp file
    /// first, then renamed over the original.
    pub async fn replace_all(&self, patients: Vec<Patient>) -> Result<usize, DatabaseError> {
        let json = serde_json::to_string_pretty(&patients)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        Ok(patients.len())
    }
}
