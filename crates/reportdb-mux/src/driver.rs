//! The multiplexing driver.
//!
//! Presents any number of sub-drivers as one [`Driver`] with a single
//! schema-version space. The space is computed by the [`Composer`] from the
//! sub-drivers' histories and the versions they were at when the mux was
//! built, so its numbering stays put while the mux upgrades them.

use async_trait::async_trait;
use tokio::sync::Mutex;

use reportdb_core::{Driver, Error, IoVersion, Result, Schemas, Version};
use reportdb_store::Registry;

use crate::compose::{Composer, Lane, Numbering, Step};
use crate::config::MuxConfig;
use crate::orchestrate;

/// Driver composing several sub-drivers.
///
/// Sub-drivers are kept in configuration order; the order breaks ties when
/// deciding which one to upgrade next.
pub struct MuxDriver {
    /// Sub-driver names, for diagnostics.
    names: Vec<String>,
    /// The sub-drivers.
    drivers: Vec<Box<dyn Driver>>,
    /// The composite version space.
    composer: Composer,
    /// Held for the whole of an upgrade or init. Reads never take it.
    upgrade_lock: Mutex<()>,
}

impl MuxDriver {
    /// Parse a configuration string and connect its sub-drivers.
    pub async fn open(config: &str, registry: &Registry) -> Result<Self> {
        Self::connect(&MuxConfig::parse(config)?, registry).await
    }

    /// Construct the configured sub-drivers through the registry and compose
    /// them.
    pub async fn connect(config: &MuxConfig, registry: &Registry) -> Result<Self> {
        let mut drivers = Vec::with_capacity(config.drivers.len());
        for spec in &config.drivers {
            let driver = registry.make(&spec.name, spec.params.as_deref())?;
            drivers.push((spec.to_string(), driver));
        }
        Self::from_drivers(drivers, config.numbering).await
    }

    /// Compose already constructed sub-drivers, given in configuration order.
    ///
    /// Reads every sub-driver's history and current version once; those fix
    /// the composite space for the lifetime of the mux.
    pub async fn from_drivers(
        drivers: Vec<(String, Box<dyn Driver>)>,
        numbering: Numbering,
    ) -> Result<Self> {
        let mut names = Vec::with_capacity(drivers.len());
        let mut boxed = Vec::with_capacity(drivers.len());
        let mut lanes = Vec::with_capacity(drivers.len());

        for (name, driver) in drivers {
            let schemas = driver.get_schemas().await?;
            let current = if driver.is_initialized().await? {
                Some(driver.get_schema().await?.0)
            } else {
                None
            };
            let lane = Lane::from_current(&schemas, current).map_err(|e| match e {
                Error::Configuration(msg) => Error::config(format!("{}: {}", name, msg)),
                Error::Diverged(msg) => Error::Diverged(format!("{}: {}", name, msg)),
                other => other,
            })?;

            names.push(name);
            boxed.push(driver);
            lanes.push(lane);
        }

        let composer = Composer::new(lanes, numbering)?;
        tracing::debug!(
            "composed {} drivers into {} schema versions",
            names.len(),
            composer.len()
        );

        Ok(Self {
            names,
            drivers: boxed,
            composer,
            upgrade_lock: Mutex::new(()),
        })
    }

    /// Sub-driver names, in configuration order.
    pub fn drivers(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The composite version space.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Current lane positions, or `None` if any sub-driver is uninitialized.
    async fn positions(&self) -> Result<Option<Vec<usize>>> {
        let mut positions = Vec::with_capacity(self.drivers.len());

        for ((name, driver), lane) in self.names.iter().zip(&self.drivers).zip(self.composer.lanes()) {
            if !driver.is_initialized().await? {
                return Ok(None);
            }
            let (version, _) = driver.get_schema().await?;
            let pos = lane.position_of(version).ok_or_else(|| {
                Error::Diverged(format!("{} is at unknown version {}", name, version))
            })?;
            positions.push(pos);
        }

        Ok(Some(positions))
    }

    /// The current state of the walk.
    async fn current(&self) -> Result<Step> {
        let positions = self.positions().await?.ok_or(Error::NotInitialized)?;
        self.composer.locate(&positions).ok_or_else(|| {
            tracing::warn!("driver positions {:?} are not on the composite walk", positions);
            Error::Diverged(format!(
                "driver positions {:?} do not form a composite version",
                positions
            ))
        })
    }
}

#[async_trait]
impl Driver for MuxDriver {
    async fn is_initialized(&self) -> Result<bool> {
        for driver in &self.drivers {
            if !driver.is_initialized().await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Initialize every uninitialized sub-driver at its version in the
    /// composite state `version`.
    ///
    /// Sub-drivers that are already initialized must already be where that
    /// state puts them.
    async fn init(&self, version: Version) -> Result<()> {
        let _guard = self.upgrade_lock.lock().await;

        if self.is_initialized().await? {
            return Err(Error::AlreadyInitialized);
        }
        let step = self
            .composer
            .find(version)
            .ok_or(Error::InvalidTarget(version))?;

        let mut pending = Vec::new();
        for (i, (driver, lane)) in self.drivers.iter().zip(self.composer.lanes()).enumerate() {
            let wanted = lane.version_at(step.positions[i]);
            if driver.is_initialized().await? {
                if driver.get_schema().await?.0 != wanted {
                    return Err(Error::InvalidTarget(version));
                }
            } else {
                pending.push((i, wanted));
            }
        }

        for (i, wanted) in pending {
            self.drivers[i].init(wanted).await?;
            tracing::info!("initialized {} at {}", self.names[i], wanted);
        }

        tracing::info!("initialized mux at {}", version);
        Ok(())
    }

    async fn get_schemas(&self) -> Result<Schemas> {
        Ok(self.composer.schemas())
    }

    async fn get_schema(&self) -> Result<(Version, IoVersion)> {
        let step = self.current().await?;
        Ok((step.version, step.io))
    }

    async fn upgrade(&self, target: Version) -> Result<()> {
        let _guard = self.upgrade_lock.lock().await;

        let current = self.current().await?;
        let plan = orchestrate::plan(&self.composer, &current, target)?;
        let reached = orchestrate::execute(&plan, &self.drivers, &self.names).await?;

        tracing::info!("upgraded mux {} -> {}", plan.from, reached);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportdb_core::io;

    #[tokio::test]
    async fn test_builtin_drivers_compose() {
        let mux = MuxDriver::open("sqlite null", &Registry::builtin())
            .await
            .unwrap();

        assert_eq!(mux.drivers().collect::<Vec<_>>(), vec!["sqlite", "null"]);
        assert!(!mux.is_initialized().await.unwrap());
        assert!(matches!(mux.get_schema().await, Err(Error::NotInitialized)));
        assert!(matches!(
            mux.upgrade(Version::new(1, 0)).await,
            Err(Error::NotInitialized)
        ));

        // sqlite 4.0 -> 4.1 -> 5.0; null never moves
        let schemas: Vec<_> = mux.get_schemas().await.unwrap().into_iter().collect();
        assert_eq!(
            schemas,
            vec![
                (Version::new(0, 0), io::V4),
                (Version::new(0, 1), io::V4),
                (Version::new(1, 0), io::V5),
            ]
        );
    }

    #[tokio::test]
    async fn test_init_then_upgrade() {
        let mux = MuxDriver::open("sqlite null", &Registry::builtin())
            .await
            .unwrap();

        mux.init(Version::new(0, 1)).await.unwrap();
        assert!(mux.is_initialized().await.unwrap());
        assert_eq!(mux.get_schema().await.unwrap(), (Version::new(0, 1), io::V4));

        assert!(matches!(
            mux.init(Version::new(0, 1)).await,
            Err(Error::AlreadyInitialized)
        ));

        mux.upgrade(Version::new(1, 0)).await.unwrap();
        assert_eq!(mux.get_schema().await.unwrap(), (Version::new(1, 0), io::V5));
    }

    #[tokio::test]
    async fn test_init_unknown_version() {
        let mux = MuxDriver::open("sqlite", &Registry::builtin()).await.unwrap();
        assert!(matches!(
            mux.init(Version::new(0, 2)).await,
            Err(Error::InvalidTarget(_))
        ));
        assert!(!mux.is_initialized().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_driver_fails_configuration() {
        let result = MuxDriver::open("sqlite bigtable", &Registry::builtin()).await;
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
