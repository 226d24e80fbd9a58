//! Interchange-format versions.
//!
//! Every report submitted to the database is encoded in some version of the
//! shared interchange format. The history below is ordered oldest first;
//! later versions can represent everything earlier ones could.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A version of the interchange data format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IoVersion {
    pub major: u32,
    pub minor: u32,
}

impl IoVersion {
    /// Create an interchange version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for IoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

pub const V1: IoVersion = IoVersion::new(1, 0);
pub const V2: IoVersion = IoVersion::new(2, 0);
pub const V3: IoVersion = IoVersion::new(3, 0);
pub const V4: IoVersion = IoVersion::new(4, 0);
pub const V5: IoVersion = IoVersion::new(5, 0);

/// All known interchange versions, oldest first.
pub const HISTORY: [IoVersion; 5] = [V1, V2, V3, V4, V5];

/// The newest interchange version.
pub const LATEST: IoVersion = V5;

/// Find the interchange version with the given major number.
pub fn by_major(major: u32) -> Option<IoVersion> {
    HISTORY.iter().copied().find(|v| v.major == major)
}

/// Interchange versions with majors in `min_major..=max_major`, oldest first.
pub fn range(min_major: u32, max_major: u32) -> Vec<IoVersion> {
    HISTORY
        .iter()
        .copied()
        .filter(|v| (min_major..=max_major).contains(&v.major))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_ordered() {
        assert!(HISTORY.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(HISTORY.last(), Some(&LATEST));
    }

    #[test]
    fn test_range() {
        assert_eq!(range(2, 3), vec![V2, V3]);
        assert_eq!(range(4, 9), vec![V4, V5]);
        assert!(range(6, 7).is_empty());
        assert!(range(3, 2).is_empty());
    }

    #[test]
    fn test_by_major() {
        assert_eq!(by_major(4), Some(V4));
        assert_eq!(by_major(0), None);
    }
}
