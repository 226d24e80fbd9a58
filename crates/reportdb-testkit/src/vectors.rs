//! Golden composite histories.
//!
//! Each vector is a mux configuration over `dummy` drivers together with the
//! complete composite history it must produce.

use reportdb_core::{io, IoVersion, Schemas, Version};

/// A mux configuration and its expected composite history.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Mux configuration string.
    pub config: &'static str,
    /// Expected history as `(major, minor, interchange major)`, oldest first.
    pub history: &'static [(u32, u32, u32)],
}

impl GoldenVector {
    /// The expected history as a schema map.
    pub fn expected(&self) -> Schemas {
        self.history
            .iter()
            .map(|&(major, minor, io)| (Version::new(major, minor), io_version(io)))
            .collect()
    }

    /// The last composite version.
    pub fn last(&self) -> Version {
        self.history
            .last()
            .map(|&(major, minor, _)| Version::new(major, minor))
            .unwrap_or(Version::ZERO)
    }
}

fn io_version(major: u32) -> IoVersion {
    io::by_major(major).unwrap_or(IoVersion::new(major, 0))
}

const TWO_DEFAULTS: &[(u32, u32, u32)] = &[
    (0, 0, 1),
    (1, 0, 1),
    (2, 0, 2),
    (3, 0, 2),
    (4, 0, 3),
    (5, 0, 3),
    (6, 0, 4),
    (7, 0, 4),
    (8, 0, 5),
];

const SHORT_AND_LONG: &[(u32, u32, u32)] = &[
    (0, 0, 1),
    (1, 0, 1),
    (2, 0, 2),
    (3, 0, 2),
    (4, 0, 3),
    (5, 0, 3),
    (6, 0, 3),
];

const STAGGERED: &[(u32, u32, u32)] = &[
    (0, 0, 1),
    (1, 0, 2),
    (2, 0, 2),
    (3, 0, 2),
    (4, 0, 3),
    (5, 0, 3),
    (6, 0, 3),
    (7, 0, 3),
    (8, 0, 3),
    (9, 0, 3),
    (10, 0, 4),
    (11, 0, 4),
    (12, 0, 4),
    (13, 0, 4),
    (14, 0, 4),
    (15, 0, 4),
    (16, 0, 5),
    (17, 0, 5),
    (18, 0, 5),
    (19, 0, 5),
];

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "single default driver",
            config: "dummy",
            history: &[(0, 0, 1), (1, 0, 2), (2, 0, 3), (3, 0, 4), (4, 0, 5)],
        },
        GoldenVector {
            name: "two default drivers",
            config: "dummy dummy",
            history: TWO_DEFAULTS,
        },
        GoldenVector {
            name: "newline separated",
            config: "dummy\ndummy",
            history: TWO_DEFAULTS,
        },
        GoldenVector {
            name: "long whitespace separated",
            config: "dummy \r\n\t\x0bdummy",
            history: TWO_DEFAULTS,
        },
        GoldenVector {
            name: "single short driver",
            config: "dummy:1:3",
            history: &[(0, 0, 1), (1, 0, 2), (2, 0, 3)],
        },
        GoldenVector {
            name: "two short drivers",
            config: "dummy:1:3 dummy:1:3",
            history: &[(0, 0, 1), (1, 0, 1), (2, 0, 2), (3, 0, 2), (4, 0, 3)],
        },
        GoldenVector {
            name: "short then long",
            config: "dummy:1:3 dummy",
            history: SHORT_AND_LONG,
        },
        GoldenVector {
            name: "long then short",
            config: "dummy dummy:1:3",
            history: SHORT_AND_LONG,
        },
        GoldenVector {
            name: "staggered majors per interchange version",
            config: "dummy:1:5:1:1:0 dummy:1:5:2:1:2 dummy:1:5:3:1:6",
            history: STAGGERED,
        },
        GoldenVector {
            name: "staggered with major steps",
            config: "dummy:1:5:1:3:0 dummy:1:5:2:2:4 dummy:1:5:3:1:6",
            history: STAGGERED,
        },
        GoldenVector {
            name: "misaligned interchange ranges",
            config: "dummy:2:5:1:1:0 dummy:1:4:1:1:0 dummy:2:3:1:1:0",
            history: &[
                (0, 0, 1),
                (1, 0, 2),
                (2, 0, 2),
                (3, 0, 2),
                (4, 0, 3),
                (5, 0, 3),
                (6, 0, 3),
                (7, 0, 3),
            ],
        },
        GoldenVector {
            name: "disconnected interchange ranges",
            config: "dummy:1:2:1:1:0 dummy:4:5:1:1:0",
            history: &[(0, 0, 1), (1, 0, 2), (2, 0, 2)],
        },
        GoldenVector {
            name: "three tied drivers with minors",
            config: "dummy:1:2:1:1:0:0:2 dummy:1:2:1:1:0:0:2 dummy:1:2:1:1:0:0:2",
            history: &[
                (0, 0, 1),
                (0, 1, 1),
                (1, 0, 1),
                (1, 1, 1),
                (2, 0, 1),
                (2, 1, 1),
                (3, 0, 2),
                (3, 1, 2),
                (3, 2, 2),
                (3, 3, 2),
            ],
        },
        GoldenVector {
            name: "minors in the second driver",
            config: "dummy:1:5:1:1:0:0:1 dummy:1:5:1:1:0:0:2",
            history: &[
                (0, 0, 1),
                (1, 0, 1),
                (1, 1, 1),
                (2, 0, 2),
                (3, 0, 2),
                (3, 1, 2),
                (4, 0, 3),
                (5, 0, 3),
                (5, 1, 3),
                (6, 0, 4),
                (7, 0, 4),
                (7, 1, 4),
                (8, 0, 5),
                (8, 1, 5),
            ],
        },
        GoldenVector {
            name: "minors in the first driver",
            config: "dummy:1:5:1:1:0:0:2 dummy:1:5:1:1:0:0:1",
            history: &[
                (0, 0, 1),
                (0, 1, 1),
                (1, 0, 1),
                (2, 0, 2),
                (2, 1, 2),
                (3, 0, 2),
                (4, 0, 3),
                (4, 1, 3),
                (5, 0, 3),
                (6, 0, 4),
                (6, 1, 4),
                (7, 0, 4),
                (8, 0, 5),
                (8, 1, 5),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_are_ordered() {
        for vector in all_vectors() {
            let expected = vector.expected();
            assert_eq!(expected.len(), vector.history.len(), "{}", vector.name);
            assert_eq!(expected.keys().next(), Some(&Version::ZERO), "{}", vector.name);

            let ios: Vec<_> = expected.values().collect();
            assert!(ios.windows(2).all(|w| w[0] <= w[1]), "{}", vector.name);
        }
    }

    #[test]
    fn test_last() {
        let vectors = all_vectors();
        assert_eq!(vectors[0].last(), Version::new(4, 0));
        assert_eq!(vectors.last().map(GoldenVector::last), Some(Version::new(8, 1)));
    }
}
