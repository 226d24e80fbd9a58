//! The `dummy` driver: a configurable in-memory schema history.
//!
//! The history covers a range of interchange versions, each accepted by a
//! fixed number of consecutive schema versions. Majors advance by a fixed
//! step and each major has a fixed number of minors. The driver starts out
//! initialized at a chosen version and remembers upgrades for as long as it
//! lives.

use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use reportdb_core::{check_upgrade, io, Driver, Error, IoVersion, Result, Schemas, Version};

/// Parameters of a [`DummyDriver`].
///
/// Textual form, all fields optional from the right:
/// `MIN_IO_MAJOR:MAX_IO_MAJOR:MAJORS_PER_IO:MAJOR_STEP:MAJOR:MINOR:MINORS_PER_MAJOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyParams {
    /// Major of the oldest interchange version accepted.
    pub min_io_major: u32,
    /// Major of the newest interchange version accepted.
    pub max_io_major: u32,
    /// Schema majors accepting each interchange version.
    pub majors_per_io: u32,
    /// Difference between consecutive schema majors.
    pub major_step: u32,
    /// Initial schema major.
    pub major: u32,
    /// Initial schema minor.
    pub minor: u32,
    /// Minors in each schema major.
    pub minors_per_major: u32,
}

impl Default for DummyParams {
    fn default() -> Self {
        Self {
            min_io_major: 1,
            max_io_major: 5,
            majors_per_io: 1,
            major_step: 1,
            major: 0,
            minor: 0,
            minors_per_major: 1,
        }
    }
}

impl DummyParams {
    /// Number of fields in the textual form.
    pub const FIELDS: usize = 7;

    /// Longest history a dummy driver may have.
    pub const MAX_LEN: usize = 100_000;

    /// Parse and validate a parameter string. The empty string gives the
    /// defaults.
    pub fn parse(s: &str) -> Result<Self> {
        let mut values = Self::default().fields();

        if !s.is_empty() {
            let fields: Vec<&str> = s.split(':').collect();
            if fields.len() > Self::FIELDS {
                return Err(Error::config(format!(
                    "dummy driver takes at most {} parameters, got {}",
                    Self::FIELDS,
                    fields.len()
                )));
            }
            for (slot, field) in values.iter_mut().zip(fields) {
                *slot = field.parse().map_err(|_| {
                    Error::config(format!("invalid dummy driver parameter {:?}", field))
                })?;
            }
        }

        let [min_io_major, max_io_major, majors_per_io, major_step, major, minor, minors_per_major] =
            values;
        let params = Self {
            min_io_major,
            max_io_major,
            majors_per_io,
            major_step,
            major,
            minor,
            minors_per_major,
        };
        params.validate()?;
        Ok(params)
    }

    fn fields(&self) -> [u32; Self::FIELDS] {
        [
            self.min_io_major,
            self.max_io_major,
            self.majors_per_io,
            self.major_step,
            self.major,
            self.minor,
            self.minors_per_major,
        ]
    }

    /// Check the parameters describe a non-empty history containing the
    /// initial version.
    pub fn validate(&self) -> Result<()> {
        if self.min_io_major > self.max_io_major {
            return Err(Error::config(format!(
                "minimum interchange major {} above maximum {}",
                self.min_io_major, self.max_io_major
            )));
        }
        if self.majors_per_io == 0 {
            return Err(Error::config("majors per interchange version must be positive"));
        }
        if self.major_step == 0 {
            return Err(Error::config("major step must be positive"));
        }
        if self.major % self.major_step != 0 {
            return Err(Error::config(format!(
                "initial major {} is not a multiple of the step {}",
                self.major, self.major_step
            )));
        }
        if self.minors_per_major == 0 {
            return Err(Error::config("minors per major must be positive"));
        }
        if self.minor >= self.minors_per_major {
            return Err(Error::config(format!(
                "initial minor {} out of {} minors per major",
                self.minor, self.minors_per_major
            )));
        }
        if self.ios().is_empty() {
            return Err(Error::config(format!(
                "no interchange versions between majors {} and {}",
                self.min_io_major, self.max_io_major
            )));
        }

        let mpm = u64::from(self.minors_per_major);
        let len = (self.ios().len() as u64)
            .checked_mul(u64::from(self.majors_per_io))
            .and_then(|n| n.checked_mul(mpm))
            .filter(|&n| n <= Self::MAX_LEN as u64)
            .ok_or_else(|| {
                Error::config(format!("history longer than {} versions", Self::MAX_LEN))
            })?;
        let last_major = (len - 1) / mpm * u64::from(self.major_step);
        if last_major > u64::from(u32::MAX) {
            return Err(Error::config(format!(
                "last major {} does not fit a schema version",
                last_major
            )));
        }
        let position = u64::from(self.major / self.major_step) * mpm + u64::from(self.minor);
        if position >= len {
            return Err(Error::config(format!(
                "initial version {} is past the end of the history",
                Version::new(self.major, self.minor)
            )));
        }
        Ok(())
    }

    fn ios(&self) -> Vec<IoVersion> {
        io::range(self.min_io_major, self.max_io_major)
    }

    /// Number of versions in the history.
    pub fn len(&self) -> usize {
        self.ios().len() * self.majors_per_io as usize * self.minors_per_major as usize
    }

    /// Always false for validated parameters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// History position of the initial version.
    pub fn position(&self) -> usize {
        let mpm = self.minors_per_major as usize;
        (self.major / self.major_step) as usize * mpm + self.minor as usize
    }

    /// Schema version at a history position.
    pub fn version_at(&self, pos: usize) -> Version {
        let mpm = self.minors_per_major as usize;
        Version::new((pos / mpm) as u32 * self.major_step, (pos % mpm) as u32)
    }

    /// The whole history.
    pub fn schemas(&self) -> Schemas {
        let per_io = self.majors_per_io as usize * self.minors_per_major as usize;
        self.ios()
            .into_iter()
            .flat_map(|io| std::iter::repeat(io).take(per_io))
            .enumerate()
            .map(|(pos, io)| (self.version_at(pos), io))
            .collect()
    }
}

impl FromStr for DummyParams {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DummyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields().iter().map(u32::to_string).collect();
        write!(f, "{}", fields.join(":"))
    }
}

/// In-memory driver following a [`DummyParams`] history.
///
/// Always initialized. Upgrades only move the remembered version.
#[derive(Debug)]
pub struct DummyDriver {
    schemas: Schemas,
    current: RwLock<Version>,
}

impl DummyDriver {
    /// Documentation shown by the registry.
    pub const DOC: &'static str = "Dummy driver with a synthetic schema history. Parameters: \
        [MIN_IO_MAJOR[:MAX_IO_MAJOR[:MAJORS_PER_IO[:MAJOR_STEP[:MAJOR[:MINOR[:MINORS_PER_MAJOR]]]]]]], \
        defaults 1:5:1:1:0:0:1.";

    /// Create a driver at the parameters' initial version.
    pub fn new(params: DummyParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            schemas: params.schemas(),
            current: RwLock::new(Version::new(params.major, params.minor)),
        })
    }

    /// Registry constructor.
    pub fn from_params(params: Option<&str>) -> Result<Box<dyn Driver>> {
        let params = DummyParams::parse(params.unwrap_or(""))?;
        Ok(Box::new(Self::new(params)?))
    }

    fn version(&self) -> Version {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Driver for DummyDriver {
    async fn is_initialized(&self) -> Result<bool> {
        Ok(true)
    }

    async fn init(&self, _version: Version) -> Result<()> {
        Err(Error::AlreadyInitialized)
    }

    async fn get_schemas(&self) -> Result<Schemas> {
        Ok(self.schemas.clone())
    }

    async fn get_schema(&self) -> Result<(Version, IoVersion)> {
        let version = self.version();
        let io = self
            .schemas
            .get(&version)
            .copied()
            .ok_or_else(|| Error::Diverged(format!("dummy driver at unknown version {}", version)))?;
        Ok((version, io))
    }

    async fn upgrade(&self, target: Version) -> Result<()> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        check_upgrade(&self.schemas, *current, target)?;
        *current = target;
        Ok(())
    }
}
