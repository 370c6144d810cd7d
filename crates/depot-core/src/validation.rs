//! Invariant auditing and determinism checking.
//!
//! [`audit`] sweeps a warehouse for broken structural invariants. A clean
//! run never produces violations; anything reported here is a logic defect,
//! which is why the audit lives in tests and debugging sessions rather than
//! in the tick path. [`validate_determinism`] checks that two runs built
//! from the same config stay hash-identical tick for tick.

use crate::config::{ConfigError, SimConfig};
use crate::engine::Warehouse;
use crate::fixed::Ticks;
use crate::grid::{GridPosition, Occupant};
use crate::id::{CartonId, RobotId};
use crate::stack::STACK_CAPACITY;

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// A broken simulation invariant found by [`audit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A carton is flagged both carried and stacked.
    CarriedAndStacked { carton: CartonId },

    /// A carton's carried flag disagrees with how many robots hold it.
    CarriedFlagOutOfSync { carton: CartonId, holders: usize },

    /// A carried carton is not co-located with the robot holding it.
    CarrierSeparated { robot: RobotId, carton: CartonId },

    /// An entity sits outside the floor bounds.
    OutOfBounds { at: GridPosition },

    /// An entity's position field disagrees with the cell index.
    IndexDesync { at: GridPosition },

    /// A stack's fill count is outside 1..=5.
    BadFill { at: GridPosition, fill: u8 },

    /// More stacks exist than the capacity-derived limit allows.
    TooManyStacks { count: usize, limit: usize },

    /// The stacked-carton counter disagrees with the carton flags.
    StackedCountMismatch { counted: u32, recorded: u32 },
}

/// Sweep the warehouse for broken invariants. Empty means healthy.
pub fn audit(world: &Warehouse) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Carton flags, holders, and co-location.
    let mut stacked_count = 0u32;
    for (carton_id, carton) in world.cartons() {
        if carton.carried && carton.stacked {
            violations.push(Violation::CarriedAndStacked { carton: carton_id });
        }
        if carton.stacked {
            stacked_count += 1;
        }

        let holders: Vec<(RobotId, GridPosition)> = world
            .robots()
            .filter(|(_, robot)| robot.carried == Some(carton_id))
            .map(|(id, robot)| (id, robot.position))
            .collect();
        let expected = if carton.carried { 1 } else { 0 };
        if holders.len() != expected {
            violations.push(Violation::CarriedFlagOutOfSync {
                carton: carton_id,
                holders: holders.len(),
            });
        }
        for &(robot_id, robot_pos) in &holders {
            if robot_pos != carton.position {
                violations.push(Violation::CarrierSeparated {
                    robot: robot_id,
                    carton: carton_id,
                });
            }
        }
    }
    if stacked_count != world.sim_state.cartons_stacked {
        violations.push(Violation::StackedCountMismatch {
            counted: stacked_count,
            recorded: world.sim_state.cartons_stacked,
        });
    }

    // Bounds and index consistency.
    for (robot_id, robot) in world.robots() {
        check_placement(
            world,
            Occupant::Robot(robot_id),
            robot.position,
            &mut violations,
        );
    }
    for (carton_id, carton) in world.cartons() {
        check_placement(
            world,
            Occupant::Carton(carton_id),
            carton.position,
            &mut violations,
        );
    }

    // Stacks.
    if world.stacks().len() > world.stacks().limit() {
        violations.push(Violation::TooManyStacks {
            count: world.stacks().len(),
            limit: world.stacks().limit(),
        });
    }
    for (at, fill) in world.stacks().iter() {
        if fill < 1 || fill > STACK_CAPACITY {
            violations.push(Violation::BadFill { at, fill });
        }
    }

    violations
}

fn check_placement(
    world: &Warehouse,
    occupant: Occupant,
    at: GridPosition,
    violations: &mut Vec<Violation>,
) {
    if !world.grid().contains(at) {
        violations.push(Violation::OutOfBounds { at });
    }
    if !world.grid().occupants_at(at).contains(&occupant) {
        violations.push(Violation::IndexDesync { at });
    }
}

// ---------------------------------------------------------------------------
// Determinism validation
// ---------------------------------------------------------------------------

/// Result of a determinism validation run.
#[derive(Debug)]
pub struct DeterminismResult {
    /// Whether the two runs produced identical state hashes throughout.
    pub is_deterministic: bool,
    /// Tick at which divergence was first detected (if any).
    pub divergence_tick: Option<Ticks>,
    /// Hash log: (tick, hash_run1, hash_run2) for each tick.
    pub hash_log: Vec<(Ticks, u64, u64)>,
}

/// Build two warehouses from the same config and verify they stay in
/// lockstep for `ticks` ticks.
///
/// Give the config a generous `max_time_secs`: the wall clock is the one
/// nondeterministic input, and a budget that expires mid-run can stop one
/// instance a tick before the other.
pub fn validate_determinism(
    config: SimConfig,
    ticks: Ticks,
) -> Result<DeterminismResult, ConfigError> {
    let mut world_a = Warehouse::new(config.clone())?;
    let mut world_b = Warehouse::new(config)?;

    let mut hash_log = Vec::new();
    let mut divergence_tick = None;

    for _ in 0..ticks {
        world_a.step();
        world_b.step();

        let hash_a = world_a.state_hash();
        let hash_b = world_b.state_hash();
        let tick = world_a.sim_state.tick;

        hash_log.push((tick, hash_a, hash_b));

        if hash_a != hash_b && divergence_tick.is_none() {
            divergence_tick = Some(tick);
        }
    }

    Ok(DeterminismResult {
        is_deterministic: divergence_tick.is_none(),
        divergence_tick,
        hash_log,
    })
}
