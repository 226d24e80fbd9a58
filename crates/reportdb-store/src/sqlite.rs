//! SQLite implementation of the Driver trait.
//!
//! The relational backend. It uses rusqlite with bundled SQLite, wrapped in
//! async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use reportdb_core::{check_init, check_upgrade, Driver, Error, IoVersion, Schemas, Version};

use crate::error::StoreError;
use crate::migration;

/// SQLite-based driver.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteDriver {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDriver {
    /// Documentation shown by the registry.
    pub const DOC: &'static str = "SQLite database. Parameters: <PATH> of the database file, \
                                   or nothing / \":memory:\" for an in-memory database.";

    /// Open a SQLite database at the given path.
    ///
    /// Creates the file if it doesn't exist. The schema is only created by
    /// [`Driver::init`].
    pub fn open(path: impl AsRef<Path>) -> reportdb_core::Result<Self> {
        let conn = Connection::open(path).map_err(StoreError::from)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> reportdb_core::Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Registry constructor.
    pub fn from_params(params: Option<&str>) -> reportdb_core::Result<Box<dyn Driver>> {
        let driver = match params {
            None | Some("") | Some(":memory:") => Self::open_memory()?,
            Some(path) => Self::open(path)?,
        };
        Ok(Box::new(driver))
    }

    /// Run a blocking operation on the connection.
    async fn run<F, T>(&self, f: F) -> reportdb_core::Result<T>
    where
        F: FnOnce(&mut Connection) -> reportdb_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Look up the interchange version of a stored schema version.
fn io_of(version: Version) -> reportdb_core::Result<IoVersion> {
    migration::schemas().get(&version).copied().ok_or_else(|| {
        StoreError::InvalidData(format!("unknown stored schema version {}", version)).into()
    })
}

#[async_trait]
impl Driver for SqliteDriver {
    async fn is_initialized(&self) -> reportdb_core::Result<bool> {
        self.run(|conn| Ok(migration::current(conn)?.is_some())).await
    }

    async fn init(&self, version: Version) -> reportdb_core::Result<()> {
        check_init(&migration::schemas(), version)?;

        self.run(move |conn| {
            if migration::current(conn)?.is_some() {
                return Err(Error::AlreadyInitialized);
            }
            migration::migrate(conn, None, version)?;
            Ok(())
        })
        .await?;

        tracing::info!("initialized SQLite schema {}", version);
        Ok(())
    }

    async fn get_schemas(&self) -> reportdb_core::Result<Schemas> {
        Ok(migration::schemas())
    }

    async fn get_schema(&self) -> reportdb_core::Result<(Version, IoVersion)> {
        let version = self
            .run(|conn| migration::current(conn)?.ok_or(Error::NotInitialized))
            .await?;
        Ok((version, io_of(version)?))
    }

    async fn upgrade(&self, target: Version) -> reportdb_core::Result<()> {
        let from = self
            .run(move |conn| {
                let current = migration::current(conn)?.ok_or(Error::NotInitialized)?;
                check_upgrade(&migration::schemas(), current, target)?;
                migration::migrate(conn, Some(current), target)?;
                Ok(current)
            })
            .await?;

        tracing::info!("upgraded SQLite schema {} -> {}", from, target);
        Ok(())
    }
}
