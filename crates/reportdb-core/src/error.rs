//! Error types shared by all drivers.

use thiserror::Error;

use crate::version::Version;

/// Errors that can occur during driver operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown driver name, or parameters the driver cannot accept.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The database has no schema version yet.
    #[error("database is not initialized")]
    NotInitialized,

    /// The database already has a schema version.
    #[error("database is already initialized")]
    AlreadyInitialized,

    /// The requested schema version is not one the driver offers.
    #[error("schema version {0} is not available")]
    InvalidTarget(Version),

    /// The requested schema version is not newer than the current one.
    #[error("schema version {target} is not newer than current version {current}")]
    Regression { target: Version, current: Version },

    /// A sub-driver failed partway through a multi-step upgrade.
    ///
    /// `reached` is the last version the whole database was left at.
    #[error("upgrade stopped at version {reached}: {source}")]
    UpgradeFailed {
        reached: Version,
        #[source]
        source: Box<Error>,
    },

    /// Sub-driver versions do not form any known combined state.
    #[error("driver versions diverged: {0}")]
    Diverged(String),

    /// Failure inside a concrete storage backend.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Build a configuration error from anything printable.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;
