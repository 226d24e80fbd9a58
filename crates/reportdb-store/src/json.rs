//! Flat-file implementation of the Driver trait.
//!
//! The whole database is one JSON document: the schema version plus one
//! collection per kind of report object. A missing file is an uninitialized
//! database. Writes go to a sibling temp file which then replaces the
//! document.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use reportdb_core::io::{V3, V4, V5};
use reportdb_core::{check_init, check_upgrade, Driver, Error, IoVersion, Schemas, Version};

use crate::error::{Result, StoreError};

/// Schema steps, oldest first: version, accepted interchange version, and
/// the collections the step adds.
const STEPS: [(Version, IoVersion, &[&str]); 4] = [
    (Version::new(1, 0), V3, &["checkouts", "builds", "tests"]),
    (Version::new(2, 0), V4, &["issues"]),
    (Version::new(2, 1), V4, &["incidents"]),
    (Version::new(3, 0), V5, &["origins"]),
];

/// The on-disk document.
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: Version,
    data: Map<String, Value>,
}

impl Document {
    /// Apply every step in `(from, to]`, adding the collections it creates.
    fn advance(&mut self, to: Version) {
        let from = self.version;
        for (version, _, collections) in STEPS.iter().filter(|(v, _, _)| *v > from && *v <= to) {
            for name in collections.iter() {
                self.data
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
            }
            self.version = *version;
        }
    }
}

/// JSON-file driver.
pub struct JsonDriver {
    /// Path of the database document.
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    lock: Arc<Mutex<()>>,
}

impl JsonDriver {
    /// Documentation shown by the registry.
    pub const DOC: &'static str = "JSON file database. Parameters: <PATH> of the file.";

    /// Use the document at `path`. The file is created by [`Driver::init`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Registry constructor.
    pub fn from_params(params: Option<&str>) -> reportdb_core::Result<Box<dyn Driver>> {
        match params {
            Some(path) if !path.is_empty() => Ok(Box::new(Self::new(path))),
            _ => Err(Error::config("json driver requires a file path")),
        }
    }

    /// Run a blocking operation on the document file under the lock.
    async fn run<F, T>(&self, f: F) -> reportdb_core::Result<T>
    where
        F: FnOnce(&Path) -> reportdb_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);

        tokio::task::spawn_blocking(move || {
            let _guard = lock
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&path)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// The schema history as a driver exposes it.
fn schemas() -> Schemas {
    STEPS.iter().map(|(v, io, _)| (*v, *io)).collect()
}

/// Read the document, or `None` if the file does not exist.
fn read(path: &Path) -> Result<Option<Document>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace the document atomically.
fn write(path: &Path, doc: &Document) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[async_trait]
impl Driver for JsonDriver {
    async fn is_initialized(&self) -> reportdb_core::Result<bool> {
        self.run(|path| Ok(read(path)?.is_some())).await
    }

    async fn init(&self, version: Version) -> reportdb_core::Result<()> {
        check_init(&schemas(), version)?;

        self.run(move |path| {
            if read(path)?.is_some() {
                return Err(Error::AlreadyInitialized);
            }
            let mut doc = Document {
                version: Version::ZERO,
                data: Map::new(),
            };
            doc.advance(version);
            write(path, &doc)?;
            Ok(())
        })
        .await?;

        tracing::info!("initialized JSON schema {} at {}", version, self.path.display());
        Ok(())
    }

    async fn get_schemas(&self) -> reportdb_core::Result<Schemas> {
        Ok(schemas())
    }

    async fn get_schema(&self) -> reportdb_core::Result<(Version, IoVersion)> {
        let version = self
            .run(|path| Ok(read(path)?.ok_or(Error::NotInitialized)?.version))
            .await?;
        let io = schemas().get(&version).copied().ok_or_else(|| {
            StoreError::InvalidData(format!("unknown stored schema version {}", version))
        })?;
        Ok((version, io))
    }

    async fn upgrade(&self, target: Version) -> reportdb_core::Result<()> {
        let from = self
            .run(move |path| {
                let mut doc = read(path)?.ok_or(Error::NotInitialized)?;
                let from = doc.version;
                check_upgrade(&schemas(), from, target)?;
                doc.advance(target);
                write(path, &doc)?;
                Ok(from)
            })
            .await?;

        tracing::info!("upgraded JSON schema {} -> {}", from, target);
        Ok(())
    }
}
