//! Shared test helpers for unit, integration, and property tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::SimConfig;
use crate::engine::Warehouse;
use crate::entity::Carton;
use crate::fixed::Fixed64;
use crate::grid::{GridPosition, Occupant};
use crate::id::{CartonId, RobotId};

pub fn pos(x: i32, y: i32) -> GridPosition {
    GridPosition::new(x, y)
}

/// Ids of all robots, in insertion order.
pub fn robot_ids(world: &Warehouse) -> Vec<RobotId> {
    world.robots().map(|(id, _)| id).collect()
}

/// Ids of all cartons, in insertion order. Pile cartons come after the
/// loose ones declared on the builder.
pub fn carton_ids(world: &Warehouse) -> Vec<CartonId> {
    world.cartons().map(|(id, _)| id).collect()
}

/// Put `carton` in `robot`'s grip, co-located on the robot's cell, as if it
/// had just been picked up.
pub fn hand_carton(world: &mut Warehouse, robot: RobotId, carton: CartonId) {
    let cell = world.robots[robot].position;
    let from = world.cartons[carton].position;
    world.robots[robot].carried = Some(carton);
    world.cartons[carton].lift();
    world.grid.relocate(Occupant::Carton(carton), from, cell);
    world.cartons[carton].position = cell;
}

/// Aim a robot at a delivery target.
pub fn set_target(world: &mut Warehouse, robot: RobotId, at: GridPosition) {
    world.robots[robot].target_stack = Some(at);
}

/// Builder for hand-placed floors. Bypasses the random scatter so tests can
/// pin down exact geometry; entity counts in the config are derived from
/// the placements.
pub struct FloorBuilder {
    config: SimConfig,
    robots: Vec<GridPosition>,
    cartons: Vec<GridPosition>,
    piles: Vec<(GridPosition, u8)>,
    stack_limit: Option<usize>,
}

impl FloorBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            config: SimConfig {
                width,
                height,
                max_time_secs: 3600,
                ..Default::default()
            },
            robots: Vec::new(),
            cartons: Vec::new(),
            piles: Vec::new(),
            stack_limit: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn max_time_secs(mut self, secs: u64) -> Self {
        self.config.max_time_secs = secs;
        self
    }

    /// Override the capacity-derived stack limit.
    pub fn stack_limit(mut self, limit: usize) -> Self {
        self.stack_limit = Some(limit);
        self
    }

    pub fn robot_at(mut self, x: i32, y: i32) -> Self {
        self.robots.push(pos(x, y));
        self
    }

    /// A loose, liftable carton.
    pub fn carton_at(mut self, x: i32, y: i32) -> Self {
        self.cartons.push(pos(x, y));
        self
    }

    /// An already-founded stack holding `fill` settled cartons.
    pub fn pile_at(mut self, x: i32, y: i32, fill: u8) -> Self {
        assert!(fill >= 1, "a founded stack holds at least one carton");
        self.piles.push((pos(x, y), fill));
        self
    }

    pub fn build(self) -> Warehouse {
        let mut config = self.config;
        config.robot_count = self.robots.len() as u32;
        config.carton_count = self.cartons.len() as u32;

        let mut world = Warehouse::with_layout(config, self.robots, self.cartons, self.stack_limit)
            .expect("valid test layout");
        for (at, fill) in self.piles {
            install_pile(&mut world, at, fill);
        }
        world
    }
}

/// Found a stack at `at` containing `fill` settled cartons, layered the way
/// real deliveries would have left them. The pile cartons join the world's
/// carton population (and its config count) as already-stacked entities.
fn install_pile(world: &mut Warehouse, at: GridPosition, fill: u8) {
    world.stacks.found(at);
    for layer in 0..fill {
        if layer > 0 {
            world.stacks.deposit(at);
        }
        let mut carton = Carton::new(at);
        carton.settle(Fixed64::from_num(layer));
        let id = world.cartons.insert(carton);
        world.grid.place(Occupant::Carton(id), at);
        world.sim_state.cartons_stacked += 1;
    }
    world.config.carton_count += fill as u32;
    world.last_state_hash = world.compute_state_hash();
}
