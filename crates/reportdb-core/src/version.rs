//! Driver schema versions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A driver schema version: a `(major, minor)` pair.
///
/// Ordered by major, then minor. Minor versions of the same major are
/// backwards-compatible revisions; a new major is a breaking schema change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The first version of any history.
    pub const ZERO: Self = Self::new(0, 0);

    /// The version following this one within the same major.
    pub const fn next_minor(self) -> Self {
        Self::new(self.major, self.minor + 1)
    }

    /// The first version of the following major.
    pub const fn next_major(self) -> Self {
        Self::new(self.major + 1, 0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<(u32, u32)> for Version {
    fn from((major, minor): (u32, u32)) -> Self {
        Self::new(major, minor)
    }
}
