pub mod connection;
pub mod document_store;
pub mod file_store;
pub mod repository;
pub mod sqlite;
pub mod store;

pub use connection::*;
pub use document_store::DocumentStore;
pub use file_store::FileStore;
pub use sqlite::*;
pub use store::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Malformed patient document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Connection lock poisoned")]
    LockPoisoned,

    #[error("Blocking task failed: {0}")]
    Task(String),
}
