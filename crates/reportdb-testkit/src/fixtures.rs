//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::PathBuf;

use tempfile::TempDir;

use reportdb_core::{Driver, Error, Result, Version};
use reportdb_store::Registry;

use crate::dummy::{DummyDriver, DummyParams};

/// The built-in drivers plus `dummy`.
pub fn dummy_registry() -> Registry {
    Registry::builtin().with("dummy", DummyDriver::DOC, DummyDriver::from_params)
}

/// Number of composite versions a mux over these dummy drivers offers.
pub fn walk_len(params: &[DummyParams]) -> usize {
    1 + params
        .iter()
        .map(|p| p.len() - 1 - p.position())
        .sum::<usize>()
}

/// Upgrade a driver through every version newer than its current one,
/// returning the versions passed through.
pub async fn upgrade_through_all(driver: &dyn Driver) -> Result<Vec<Version>> {
    let mut passed = Vec::new();
    for version in driver.get_schemas().await?.into_keys() {
        if version > driver.get_schema().await?.0 {
            driver.upgrade(version).await?;
            passed.push(version);
        }
    }
    Ok(passed)
}

/// A scratch directory for file-backed drivers, with a registry that knows
/// `dummy`.
pub struct TestFixture {
    pub registry: Registry,
    dir: TempDir,
}

impl TestFixture {
    /// Create a fixture with a fresh temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().map_err(|e| Error::Backend(Box::new(e)))?;
        Ok(Self {
            registry: dummy_registry(),
            dir,
        })
    }

    /// Path of a file inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Mux entry for an SQLite database in the scratch directory.
    pub fn sqlite_entry(&self, name: &str) -> String {
        format!("sqlite:{}", self.path(name).display())
    }

    /// Mux entry for a JSON file in the scratch directory.
    pub fn json_entry(&self, name: &str) -> String {
        format!("json:{}", self.path(name).display())
    }
}
