//! Driver registry: maps driver names to constructors.
//!
//! The table is filled at startup, either with the built-in drivers or by
//! hand. Construction is the only thing it does; it knows nothing about
//! schema versions.

use std::collections::BTreeMap;

use reportdb_core::{Driver, Error, Result};

use crate::json::JsonDriver;
use crate::null::NullDriver;
use crate::sqlite::SqliteDriver;

/// Builds a driver from its optional parameter string.
pub type Constructor = fn(Option<&str>) -> Result<Box<dyn Driver>>;

struct Entry {
    doc: &'static str,
    make: Constructor,
}

/// A registration table of driver constructors, keyed by name.
pub struct Registry {
    entries: BTreeMap<String, Entry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in drivers: `null`, `sqlite`, `json`.
    pub fn builtin() -> Self {
        Self::new()
            .with("null", NullDriver::DOC, NullDriver::from_params)
            .with("sqlite", SqliteDriver::DOC, SqliteDriver::from_params)
            .with("json", JsonDriver::DOC, JsonDriver::from_params)
    }

    /// Register a driver, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, doc: &'static str, make: Constructor) -> &mut Self {
        self.entries.insert(name.to_string(), Entry { doc, make });
        self
    }

    /// Builder form of [`Registry::register`].
    pub fn with(mut self, name: &str, doc: &'static str, make: Constructor) -> Self {
        self.register(name, doc, make);
        self
    }

    /// Construct the driver registered under `name`.
    pub fn make(&self, name: &str, params: Option<&str>) -> Result<Box<dyn Driver>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| Error::config(format!("unknown driver {:?}", name)))?;
        tracing::debug!("constructing {} driver with params {:?}", name, params);
        (entry.make)(params)
    }

    /// Check whether a driver is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Documentation of a registered driver.
    pub fn doc(&self, name: &str) -> Option<&'static str> {
        self.entries.get(name).map(|e| e.doc)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
