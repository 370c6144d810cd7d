//! Property-based tests for the warehouse engine.
//!
//! Uses proptest to generate random floor configurations and run lengths,
//! then verify the structural properties every run must uphold.

use depot_core::config::SimConfig;
use depot_core::engine::Warehouse;
use depot_core::grid::GridPosition;
use depot_core::id::RobotId;
use depot_core::validation::audit;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Generate a random valid floor configuration with an effectively
/// unlimited wall-clock budget, so the only stop condition in play is full
/// consolidation.
fn arb_config() -> impl Strategy<Value = SimConfig> {
    (4u32..14, 4u32..14, 0u32..14, 1u32..6, any::<u64>())
        .prop_map(|(width, height, carton_count, robot_count, seed)| SimConfig {
            width,
            height,
            carton_count,
            robot_count,
            max_time_secs: 3600,
            seed,
        })
        .prop_filter("entities must fit on the floor", |c| {
            (c.robot_count + c.carton_count) as u64 <= c.width as u64 * c.height as u64
        })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Invariants hold after every tick, progress is monotone, and robots
    /// never jump more than one cell.
    #[test]
    fn runs_stay_structurally_sound(config in arb_config(), ticks in 1u64..100) {
        let mut world = Warehouse::new(config.clone()).unwrap();
        let limit = config.amount_stacks();
        let mut last_stacked = 0u32;

        for _ in 0..ticks {
            let before: Vec<(RobotId, GridPosition)> =
                world.robots().map(|(id, r)| (id, r.position)).collect();

            world.step();

            let violations = audit(&world);
            prop_assert!(violations.is_empty(), "violations: {violations:?}");

            let stacked = world.sim_state.cartons_stacked;
            prop_assert!(stacked >= last_stacked);
            prop_assert!(stacked <= config.carton_count);
            last_stacked = stacked;

            prop_assert!(world.stacks().len() <= limit);

            for (id, prev) in before {
                let now = world.robot(id).unwrap().position;
                prop_assert!(prev.manhattan_distance(&now) <= 1);
            }

            if !world.is_running() {
                break;
            }
        }
    }

    /// Two runs from the same config produce identical state hashes tick
    /// for tick.
    #[test]
    fn runs_are_reproducible(config in arb_config(), ticks in 1u64..60) {
        let mut world_a = Warehouse::new(config.clone()).unwrap();
        let mut world_b = Warehouse::new(config).unwrap();
        for _ in 0..ticks {
            world_a.step();
            world_b.step();
            prop_assert_eq!(world_a.state_hash(), world_b.state_hash());
        }
    }

    /// Cartons are never created or destroyed after construction.
    #[test]
    fn carton_population_is_conserved(config in arb_config(), ticks in 1u64..60) {
        let mut world = Warehouse::new(config.clone()).unwrap();
        for _ in 0..ticks {
            world.step();
            prop_assert_eq!(world.carton_count() as u32, config.carton_count);
            prop_assert_eq!(world.robot_count() as u32, config.robot_count);
        }
    }

    /// Once stopped, further ticks change nothing.
    #[test]
    fn stopped_worlds_are_frozen(seed in any::<u64>()) {
        let mut world = Warehouse::new(SimConfig {
            carton_count: 0,
            seed,
            ..Default::default()
        }).unwrap();
        world.step();
        prop_assert!(!world.is_running());

        let hash = world.state_hash();
        for _ in 0..5 {
            let report = world.step();
            prop_assert_eq!(report.counted_moves, 0);
            prop_assert_eq!(world.state_hash(), hash);
        }
    }
}
