//! Error types for the store drivers.

use thiserror::Error;

/// Errors raised inside a storage backend.
///
/// Drivers surface these to callers as [`reportdb_core::Error::Backend`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON document encoding/decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock guarding the backend was poisoned by a panicking thread.
    #[error("lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking task running a backend call failed.
    #[error("blocking task failed: {0}")]
    Task(String),
}

impl From<StoreError> for reportdb_core::Error {
    fn from(e: StoreError) -> Self {
        reportdb_core::Error::Backend(Box::new(e))
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, StoreError>;
