//! Fault injection.

use std::io;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use reportdb_core::{Driver, Error, IoVersion, Result, Schemas, Version};

/// Wraps a driver and fails its upgrade to one chosen version.
///
/// Every other call goes straight to the inner driver. Attempted upgrades
/// are recorded, failed or not.
pub struct FaultyDriver {
    inner: Box<dyn Driver>,
    fail_at: Version,
    attempts: Mutex<Vec<Version>>,
}

impl FaultyDriver {
    /// Wrap `inner`, failing any upgrade to `fail_at`.
    pub fn new(inner: Box<dyn Driver>, fail_at: Version) -> Self {
        Self {
            inner,
            fail_at,
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Upgrade targets requested so far, in order.
    pub fn attempts(&self) -> Vec<Version> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Driver for FaultyDriver {
    async fn is_initialized(&self) -> Result<bool> {
        self.inner.is_initialized().await
    }

    async fn init(&self, version: Version) -> Result<()> {
        self.inner.init(version).await
    }

    async fn get_schemas(&self) -> Result<Schemas> {
        self.inner.get_schemas().await
    }

    async fn get_schema(&self) -> Result<(Version, IoVersion)> {
        self.inner.get_schema().await
    }

    async fn upgrade(&self, target: Version) -> Result<()> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target);

        if target == self.fail_at {
            return Err(Error::Backend(Box::new(io::Error::new(
                io::ErrorKind::Other,
                format!("injected failure upgrading to {}", target),
            ))));
        }
        self.inner.upgrade(target).await
    }
}
