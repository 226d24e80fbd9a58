//! Version composition: one schema-version space out of many.
//!
//! Each sub-driver contributes a *lane*: its ordered schema history and the
//! position it started from. The composer walks all lanes together, one
//! single-lane step at a time, and numbers the states it visits. Those
//! numbers are the mux's own schema versions.
//!
//! ## The walk
//!
//! ```text
//! state 0:  every lane at its origin position
//! state k:  state k-1 with exactly one lane advanced by one position
//! end:      every lane at its last position
//! ```
//!
//! The lane advanced at each step is the one, among lanes that can still
//! advance, whose current interchange version is lowest; ties go to the lane
//! configured first. The interchange version of a state is the minimum over
//! all lanes, so data tagged with it can be written to every sub-driver.
//!
//! Because every step moves one lane by one position, the number of states
//! is always `1 + Σ (last − origin)`.

use reportdb_core::{io, Error, IoVersion, Result, Schemas, Version};

/// How composite versions are numbered along the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Numbering {
    /// A step bumps the composite minor when the advanced sub-driver made a
    /// minor-only step (same major), and the composite major otherwise.
    #[default]
    FollowDrivers,
    /// Every step bumps the composite major.
    MajorOnly,
}

/// One sub-driver's schema history as seen by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    versions: Vec<(Version, IoVersion)>,
    origin: usize,
}

impl Lane {
    /// Create a lane starting at position `origin` of `schemas`.
    pub fn new(schemas: &Schemas, origin: usize) -> Result<Self> {
        let versions: Vec<(Version, IoVersion)> =
            schemas.iter().map(|(v, io)| (*v, *io)).collect();

        if versions.is_empty() {
            return Err(Error::config("driver offers no schema versions"));
        }
        if origin >= versions.len() {
            return Err(Error::config(format!(
                "origin position {} outside a history of {} versions",
                origin,
                versions.len()
            )));
        }
        if versions.windows(2).any(|w| w[1].1 < w[0].1) {
            return Err(Error::config(
                "driver history maps a later version to an older interchange version",
            ));
        }

        Ok(Self { versions, origin })
    }

    /// Create a lane starting at `current`, or at the first version if the
    /// driver is not initialized.
    pub fn from_current(schemas: &Schemas, current: Option<Version>) -> Result<Self> {
        let origin = match current {
            None => 0,
            Some(version) => schemas
                .keys()
                .position(|v| *v == version)
                .ok_or_else(|| {
                    Error::Diverged(format!("current version {} is not in the history", version))
                })?,
        };
        Self::new(schemas, origin)
    }

    /// The position the walk starts from.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// The last position.
    pub fn last(&self) -> usize {
        self.versions.len() - 1
    }

    /// The schema version at `pos`.
    pub fn version_at(&self, pos: usize) -> Version {
        self.versions[pos].0
    }

    /// The interchange version at `pos`.
    pub fn io_at(&self, pos: usize) -> IoVersion {
        self.versions[pos].1
    }

    /// The position of a schema version.
    pub fn position_of(&self, version: Version) -> Option<usize> {
        self.versions.iter().position(|(v, _)| *v == version)
    }

    /// Steps left from `pos` to the end of the history.
    fn remaining(&self, pos: usize) -> usize {
        self.last() - pos
    }
}

/// One state of the composite walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Composite version of this state.
    pub version: Version,
    /// Interchange version every sub-driver accepts in this state.
    pub io: IoVersion,
    /// Position of each lane, in configuration order.
    pub positions: Vec<usize>,
    /// Lane advanced to reach this state; `None` for the first state.
    pub advanced: Option<usize>,
}

/// Computes the composite version space of a set of lanes.
#[derive(Debug, Clone)]
pub struct Composer {
    lanes: Vec<Lane>,
    numbering: Numbering,
}

impl Composer {
    /// Create a composer over lanes in configuration order.
    pub fn new(lanes: Vec<Lane>, numbering: Numbering) -> Result<Self> {
        if lanes.is_empty() {
            return Err(Error::config("no drivers to compose"));
        }
        Ok(Self { lanes, numbering })
    }

    /// The lanes, in configuration order.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// The numbering rule.
    pub fn numbering(&self) -> Numbering {
        self.numbering
    }

    /// Walk the whole space, from the origin state to the last one.
    ///
    /// The walk is lazy and every call starts over, yielding the same steps.
    pub fn walk(&self) -> Walk<'_> {
        let positions: Vec<usize> = self.lanes.iter().map(Lane::origin).collect();
        Walk {
            composer: self,
            next: Some(Step {
                version: Version::ZERO,
                io: self.io_at(&positions),
                positions,
                advanced: None,
            }),
        }
    }

    /// Number of states in the space.
    pub fn len(&self) -> usize {
        1 + self
            .lanes
            .iter()
            .map(|lane| lane.remaining(lane.origin))
            .sum::<usize>()
    }

    /// Always false: a space has at least its origin state.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every composite version with its interchange version.
    pub fn schemas(&self) -> Schemas {
        self.walk().map(|step| (step.version, step.io)).collect()
    }

    /// Find the state with the given lane positions.
    pub fn locate(&self, positions: &[usize]) -> Option<Step> {
        self.walk().find(|step| step.positions == positions)
    }

    /// Find the state with the given composite version.
    pub fn find(&self, version: Version) -> Option<Step> {
        self.walk()
            .take_while(|step| step.version <= version)
            .find(|step| step.version == version)
    }

    /// Effective interchange version of a set of lane positions.
    pub fn io_at(&self, positions: &[usize]) -> IoVersion {
        self.lanes
            .iter()
            .zip(positions)
            .map(|(lane, &pos)| lane.io_at(pos))
            .min()
            // Lanes are never empty
            .unwrap_or(io::LATEST)
    }

    /// The state following `step`, if any lane can still advance.
    fn advance(&self, step: &Step) -> Option<Step> {
        let lane = (0..self.lanes.len())
            .filter(|&i| step.positions[i] < self.lanes[i].last())
            .min_by_key(|&i| self.lanes[i].io_at(step.positions[i]))?;

        let mut positions = step.positions.clone();
        let before = self.lanes[lane].version_at(positions[lane]);
        positions[lane] += 1;
        let after = self.lanes[lane].version_at(positions[lane]);

        let version = match self.numbering {
            Numbering::FollowDrivers if after.major == before.major => step.version.next_minor(),
            _ => step.version.next_major(),
        };

        Some(Step {
            version,
            io: self.io_at(&positions),
            positions,
            advanced: Some(lane),
        })
    }
}

/// Lazy iterator over the states of a [`Composer`].
pub struct Walk<'a> {
    composer: &'a Composer,
    next: Option<Step>,
}

impl Iterator for Walk<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let step = self.next.take()?;
        self.next = self.composer.advance(&step);
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = match &self.next {
            Some(step) => {
                1 + self
                    .composer
                    .lanes
                    .iter()
                    .zip(&step.positions)
                    .map(|(lane, &pos)| lane.remaining(pos))
                    .sum::<usize>()
            }
            None => 0,
        };
        (left, Some(left))
    }
}

impl ExactSizeIterator for Walk<'_> {}
