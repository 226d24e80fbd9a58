//! Error types for the client.

use reportdb_core::Error;
use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Error from the underlying driver.
    #[error("driver error: {0}")]
    Driver(#[from] Error),

    /// The driver offers no schema versions at all.
    #[error("driver {0} offers no schema versions")]
    EmptyHistory(String),
}

impl ClientError {
    /// The driver error behind this one, if any.
    pub fn driver(&self) -> Option<&Error> {
        match self {
            ClientError::Driver(e) => Some(e),
            ClientError::EmptyHistory(_) => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
