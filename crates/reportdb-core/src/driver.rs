//! Driver trait: the uniform interface to every database backend.
//!
//! Concrete stores (SQLite, JSON files, the null store) and the multiplexing
//! driver all implement it, so callers never need to know which one they
//! hold.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::io::IoVersion;
use crate::version::Version;

/// A driver's schema history: each schema version and the interchange
/// version it accepts.
///
/// Iteration order is ascending version order. Interchange versions never
/// decrease along it.
pub type Schemas = BTreeMap<Version, IoVersion>;

/// The Driver trait: async interface for schema-versioned storage.
///
/// All methods take `&self`; implementations keep their state behind
/// interior mutability so a driver can be shared between tasks.
///
/// # Design Notes
///
/// - **Fixed history**: `get_schemas` returns the same mapping for the whole
///   lifetime of a driver instance, whatever its current version.
/// - **Forward only**: `upgrade` never moves a database to an older version.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Check whether the database has a schema version.
    async fn is_initialized(&self) -> Result<bool>;

    /// Create the database schema at `version`.
    ///
    /// Fails with [`Error::AlreadyInitialized`] if the database is initialized
    /// and with [`Error::InvalidTarget`] if `version` is not in the history.
    async fn init(&self, version: Version) -> Result<()>;

    /// Get every schema version the driver offers. Never empty.
    async fn get_schemas(&self) -> Result<Schemas>;

    /// Get the current schema version and the interchange version it accepts.
    ///
    /// Fails with [`Error::NotInitialized`] if the database is not initialized.
    async fn get_schema(&self) -> Result<(Version, IoVersion)>;

    /// Upgrade the database schema to `target`.
    ///
    /// Fails with [`Error::NotInitialized`], [`Error::Regression`] if `target`
    /// is not newer than the current version, or [`Error::InvalidTarget`] if
    /// `target` is not in the history.
    async fn upgrade(&self, target: Version) -> Result<()>;
}

/// Validate an upgrade target against a history and the current version.
pub fn check_upgrade(schemas: &Schemas, current: Version, target: Version) -> Result<IoVersion> {
    if target <= current {
        return Err(Error::Regression { target, current });
    }
    schemas
        .get(&target)
        .copied()
        .ok_or(Error::InvalidTarget(target))
}

/// Validate an initialization version against a history.
pub fn check_init(schemas: &Schemas, version: Version) -> Result<IoVersion> {
    schemas
        .get(&version)
        .copied()
        .ok_or(Error::InvalidTarget(version))
}

/// The newest entry of a history.
pub fn latest(schemas: &Schemas) -> Option<(Version, IoVersion)> {
    schemas.last_key_value().map(|(v, io)| (*v, *io))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{V1, V2, V3};

    fn history() -> Schemas {
        Schemas::from([
            (Version::new(0, 0), V1),
            (Version::new(0, 1), V1),
            (Version::new(1, 0), V2),
            (Version::new(2, 0), V3),
        ])
    }

    #[test]
    fn test_check_upgrade_accepts_newer() {
        let io = check_upgrade(&history(), Version::new(0, 1), Version::new(2, 0)).unwrap();
        assert_eq!(io, V3);
    }

    #[test]
    fn test_check_upgrade_rejects_regression() {
        let err = check_upgrade(&history(), Version::new(1, 0), Version::new(1, 0)).unwrap_err();
        assert!(matches!(err, Error::Regression { .. }));

        // Unknown and older still counts as a regression
        let err = check_upgrade(&history(), Version::new(1, 0), Version::new(0, 7)).unwrap_err();
        assert!(matches!(err, Error::Regression { .. }));
    }

    #[test]
    fn test_check_upgrade_rejects_unknown() {
        let err = check_upgrade(&history(), Version::new(0, 0), Version::new(1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(v) if v == Version::new(1, 1)));
    }

    #[test]
    fn test_check_init() {
        assert_eq!(check_init(&history(), Version::new(0, 1)).unwrap(), V1);
        assert!(matches!(
            check_init(&history(), Version::new(5, 0)),
            Err(Error::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_latest() {
        assert_eq!(latest(&history()), Some((Version::new(2, 0), V3)));
        assert_eq!(latest(&Schemas::new()), None);
    }
}
