//! The null driver: stores nothing.
//!
//! It has a single schema version accepting the newest interchange format,
//! and is always initialized. Useful as a placeholder in a multiplexed setup
//! and for exercising callers without a real backend.

use async_trait::async_trait;

use reportdb_core::{check_init, check_upgrade, io, Driver, Error, IoVersion, Schemas, Version};

/// Driver that discards everything.
#[derive(Debug, Default)]
pub struct NullDriver;

impl NullDriver {
    /// Documentation shown by the registry.
    pub const DOC: &'static str = "Null database, discarding all data. No parameters.";

    /// The only schema version.
    pub const VERSION: Version = Version::ZERO;

    /// Create a null driver.
    pub fn new() -> Self {
        Self
    }

    /// Registry constructor.
    pub fn from_params(params: Option<&str>) -> reportdb_core::Result<Box<dyn Driver>> {
        match params {
            None | Some("") => Ok(Box::new(Self::new())),
            Some(p) => Err(Error::config(format!(
                "null driver takes no parameters, got {:?}",
                p
            ))),
        }
    }
}

#[async_trait]
impl Driver for NullDriver {
    async fn is_initialized(&self) -> reportdb_core::Result<bool> {
        Ok(true)
    }

    async fn init(&self, version: Version) -> reportdb_core::Result<()> {
        check_init(&self.get_schemas().await?, version)?;
        Ok(())
    }

    async fn get_schemas(&self) -> reportdb_core::Result<Schemas> {
        Ok(Schemas::from([(Self::VERSION, io::LATEST)]))
    }

    async fn get_schema(&self) -> reportdb_core::Result<(Version, IoVersion)> {
        Ok((Self::VERSION, io::LATEST))
    }

    async fn upgrade(&self, target: Version) -> reportdb_core::Result<()> {
        check_upgrade(&self.get_schemas().await?, Self::VERSION, target)?;
        Ok(())
    }
}
