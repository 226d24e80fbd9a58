//! Upgrade orchestration: turning a composite upgrade into sub-driver
//! upgrades.
//!
//! A composite upgrade from state A to a later state B replays the walk from
//! A to B. Every step of it advances one sub-driver by one version, so it
//! becomes one call to that sub-driver's own `upgrade`. Calls run in walk
//! order, which keeps every intermediate state a valid state of the walk.

use reportdb_core::{Driver, Error, Result, Version};

use crate::compose::{Composer, Step};

/// One sub-driver upgrade of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Lane (sub-driver index) to upgrade.
    pub lane: usize,
    /// Sub-driver version to upgrade it to.
    pub version: Version,
    /// Composite version reached once this move succeeds.
    pub reaches: Version,
}

/// The ordered sub-driver upgrades realizing a composite upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Composite version the plan starts from.
    pub from: Version,
    /// Composite version the plan ends at.
    pub target: Version,
    /// Sub-driver upgrades, in walk order.
    pub moves: Vec<Move>,
}

/// Plan an upgrade from `current` to `target`.
///
/// Fails with [`Error::Regression`] if `target` is not newer than `current`
/// and with [`Error::InvalidTarget`] if `target` is not a composite version.
pub fn plan(composer: &Composer, current: &Step, target: Version) -> Result<Plan> {
    if target <= current.version {
        return Err(Error::Regression {
            target,
            current: current.version,
        });
    }

    let mut moves = Vec::new();
    for step in composer
        .walk()
        .skip_while(|step| step.version <= current.version)
        .take_while(|step| step.version <= target)
    {
        if let Some(lane) = step.advanced {
            moves.push(Move {
                lane,
                version: composer.lanes()[lane].version_at(step.positions[lane]),
                reaches: step.version,
            });
        }
    }

    match moves.last() {
        Some(last) if last.reaches == target => Ok(Plan {
            from: current.version,
            target,
            moves,
        }),
        _ => Err(Error::InvalidTarget(target)),
    }
}

/// Run a plan against the sub-drivers, in order.
///
/// Stops at the first failing sub-driver. Moves already applied stay applied;
/// the error reports the composite version they add up to.
pub async fn execute(plan: &Plan, drivers: &[Box<dyn Driver>], names: &[String]) -> Result<Version> {
    let mut reached = plan.from;

    for mv in &plan.moves {
        let name = names.get(mv.lane).map(String::as_str).unwrap_or("?");

        if let Err(e) = drivers[mv.lane].upgrade(mv.version).await {
            tracing::warn!(
                "upgrade of {} to {} failed, mux stays at {}: {}",
                name,
                mv.version,
                reached,
                e
            );
            return Err(Error::UpgradeFailed {
                reached,
                source: Box::new(e),
            });
        }

        tracing::info!("upgraded {} to {}, mux at {}", name, mv.version, mv.reaches);
        reached = mv.reaches;
    }

    Ok(reached)
}
