//! The Client: one database behind any driver.
//!
//! A client is opened from a driver specification, `<name>[:<params>]`. The
//! name `mux` is special: its parameters are a whole mux configuration, a
//! whitespace-separated list of further specifications.

use reportdb_core::{latest, Driver, IoVersion, Schemas, Version};
use reportdb_mux::{MuxConfig, MuxDriver};
use reportdb_store::Registry;

use crate::error::{ClientError, Result};

/// Name under which the multiplexing driver is opened.
pub const MUX: &str = "mux";

/// A database, through its driver.
pub struct Client {
    /// Specification the client was opened with.
    spec: String,
    /// The driver.
    driver: Box<dyn Driver>,
}

impl Client {
    /// Open a database with the built-in drivers.
    pub async fn open(spec: &str) -> Result<Self> {
        Self::open_with(spec, &Registry::builtin()).await
    }

    /// Open a database, constructing drivers from `registry`.
    pub async fn open_with(spec: &str, registry: &Registry) -> Result<Self> {
        let spec = spec.trim();
        let (name, params) = match spec.split_once(':') {
            Some((name, params)) => (name, Some(params)),
            None => (spec, None),
        };

        let driver: Box<dyn Driver> = if name == MUX {
            let config = MuxConfig::parse(params.unwrap_or(""))?;
            Box::new(MuxDriver::connect(&config, registry).await?)
        } else {
            registry.make(name, params)?
        };

        tracing::debug!("opened {}", spec);
        Ok(Self::from_driver(spec, driver))
    }

    /// Wrap an already constructed driver.
    pub fn from_driver(spec: impl Into<String>, driver: Box<dyn Driver>) -> Self {
        Self {
            spec: spec.into(),
            driver,
        }
    }

    /// The specification the client was opened with.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// The driver.
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Check whether the database has a schema version.
    pub async fn is_initialized(&self) -> Result<bool> {
        Ok(self.driver.is_initialized().await?)
    }

    /// The driver's schema history.
    pub async fn get_schemas(&self) -> Result<Schemas> {
        Ok(self.driver.get_schemas().await?)
    }

    /// The current schema version and its interchange version.
    pub async fn get_schema(&self) -> Result<(Version, IoVersion)> {
        Ok(self.driver.get_schema().await?)
    }

    /// Initialize the database at `version`, or at the latest version.
    pub async fn init(&self, version: Option<Version>) -> Result<Version> {
        let version = match version {
            Some(version) => version,
            None => self.latest().await?,
        };
        self.driver.init(version).await?;
        tracing::info!("initialized {} at {}", self.spec, version);
        Ok(version)
    }

    /// Upgrade the database to `target`, or to the latest version.
    ///
    /// Upgrading to the latest version when already there does nothing.
    /// Returns the version the database ends up at.
    pub async fn upgrade(&self, target: Option<Version>) -> Result<Version> {
        let target = match target {
            Some(target) => target,
            None => {
                let latest = self.latest().await?;
                let (current, _) = self.driver.get_schema().await?;
                if current == latest {
                    tracing::debug!("{} is already at {}", self.spec, latest);
                    return Ok(latest);
                }
                latest
            }
        };

        self.driver.upgrade(target).await?;
        tracing::info!("upgraded {} to {}", self.spec, target);
        Ok(target)
    }

    async fn latest(&self) -> Result<Version> {
        latest(&self.driver.get_schemas().await?)
            .map(|(version, _)| version)
            .ok_or_else(|| ClientError::EmptyHistory(self.spec.clone()))
    }
}
