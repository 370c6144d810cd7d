//! The warehouse simulation engine: owns the floor grid, robots, cartons,
//! and stack registry, and orchestrates the four-phase tick pipeline.
//!
//! # Architecture
//!
//! The `Warehouse` owns:
//! - A [`FloorGrid`] (sparse multi-occupancy cell index)
//! - Robots and cartons in slotmaps, cross-referenced by id only
//! - A [`StackRegistry`] (founded stacks and their fill counts)
//! - A [`SimState`] (tick counter, move counter, wall clock, stop state)
//! - A [`SimRng`] (instance-local, seeded from the config)
//! - An [`EventBus`] for typed simulation events
//!
//! Each instance is fully self-contained: no globals, no sharing between
//! concurrently running warehouses. A tick is a finite, strictly sequential
//! computation, so no locking is ever involved.
//!
//! # Four-Phase Pipeline
//!
//! Each `step()` runs:
//! 1. **Clock** -- record the wall-clock start on the first tick
//! 2. **Activation** -- shuffle robot order, run each robot's decision step
//! 3. **Bookkeeping** -- tick counter, elapsed time, stop condition, state hash
//! 4. **Post-tick** -- deliver buffered events to subscribers
//!
//! Ticking a stopped warehouse is a no-op: the state (including robot
//! positions and the RNG) is left untouched and a zeroed [`TickReport`] is
//! returned.

use std::time::{Duration, Instant};

use slotmap::{Key, SlotMap};

use crate::config::{ConfigError, SimConfig};
use crate::entity::{Carton, Robot};
use crate::event::{Event, EventBus};
use crate::fixed::fixed64_to_f64;
use crate::grid::{FloorGrid, GridPosition, Occupant};
use crate::id::{CartonId, RobotId};
use crate::query::{CartonSnapshot, RobotSnapshot, StackSnapshot, WorldSnapshot};
use crate::rng::SimRng;
use crate::sim::{SimState, StateHash, StopReason, TickReport};
use crate::stack::StackRegistry;

/// The core simulation engine for one warehouse floor.
#[derive(Debug)]
pub struct Warehouse {
    pub(crate) config: SimConfig,
    pub(crate) grid: FloorGrid,
    pub(crate) robots: SlotMap<RobotId, Robot>,
    pub(crate) cartons: SlotMap<CartonId, Carton>,
    pub(crate) stacks: StackRegistry,

    /// Tick, move, and stop bookkeeping.
    pub sim_state: SimState,

    /// Typed event bus for simulation events.
    pub event_bus: EventBus,

    pub(crate) rng: SimRng,
    pub(crate) last_state_hash: u64,
}

impl Warehouse {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Build a warehouse from the given config, scattering robots and
    /// cartons over distinct random cells (sampling without replacement
    /// over the whole floor).
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = SimRng::new(config.seed);
        let cells = config.width as usize * config.height as usize;
        let picks = rng.sample_indices(cells, (config.robot_count + config.carton_count) as usize);

        let width = config.width as i32;
        let mut robot_cells = Vec::with_capacity(config.robot_count as usize);
        let mut carton_cells = Vec::with_capacity(config.carton_count as usize);
        for (i, &cell) in picks.iter().enumerate() {
            let pos = GridPosition::new(cell as i32 % width, cell as i32 / width);
            if i < config.robot_count as usize {
                robot_cells.push(pos);
            } else {
                carton_cells.push(pos);
            }
        }

        let limit = config.amount_stacks();
        Ok(Self::from_parts(config, rng, robot_cells, carton_cells, limit))
    }

    /// Build a warehouse with explicit entity placements instead of random
    /// scatter. `config` counts must match the placement lists.
    pub(crate) fn with_layout(
        config: SimConfig,
        robot_cells: Vec<GridPosition>,
        carton_cells: Vec<GridPosition>,
        stack_limit: Option<usize>,
    ) -> Result<Self, ConfigError> {
        debug_assert_eq!(config.robot_count as usize, robot_cells.len());
        debug_assert_eq!(config.carton_count as usize, carton_cells.len());
        config.validate()?;

        let rng = SimRng::new(config.seed);
        let limit = stack_limit.unwrap_or_else(|| config.amount_stacks());
        Ok(Self::from_parts(config, rng, robot_cells, carton_cells, limit))
    }

    fn from_parts(
        config: SimConfig,
        rng: SimRng,
        robot_cells: Vec<GridPosition>,
        carton_cells: Vec<GridPosition>,
        stack_limit: usize,
    ) -> Self {
        let mut grid = FloorGrid::new(config.width, config.height);
        let mut robots = SlotMap::with_key();
        let mut cartons = SlotMap::with_key();

        for pos in robot_cells {
            let id = robots.insert(Robot::new(pos));
            grid.place(Occupant::Robot(id), pos);
        }
        for pos in carton_cells {
            let id = cartons.insert(Carton::new(pos));
            grid.place(Occupant::Carton(id), pos);
        }

        let mut warehouse = Self {
            config,
            grid,
            robots,
            cartons,
            stacks: StackRegistry::new(stack_limit),
            sim_state: SimState::new(),
            event_bus: EventBus::new(),
            rng,
            last_state_hash: 0,
        };
        warehouse.last_state_hash = warehouse.compute_state_hash();
        warehouse
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &FloorGrid {
        &self.grid
    }

    pub fn stacks(&self) -> &StackRegistry {
        &self.stacks
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id)
    }

    pub fn carton(&self, id: CartonId) -> Option<&Carton> {
        self.cartons.get(id)
    }

    /// Iterate over robots in insertion order.
    pub fn robots(&self) -> impl Iterator<Item = (RobotId, &Robot)> {
        self.robots.iter()
    }

    /// Iterate over cartons in insertion order.
    pub fn cartons(&self) -> impl Iterator<Item = (CartonId, &Carton)> {
        self.cartons.iter()
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    pub fn carton_count(&self) -> usize {
        self.cartons.len()
    }

    pub fn is_running(&self) -> bool {
        self.sim_state.running
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.sim_state.stop_reason
    }

    /// The most recently computed state hash. Covers positions, entity
    /// flags, stacks, counters, and RNG state -- never wall-clock fields,
    /// so two same-seed runs hash identically tick for tick.
    pub fn state_hash(&self) -> u64 {
        self.last_state_hash
    }

    // -----------------------------------------------------------------------
    // Movement helpers
    // -----------------------------------------------------------------------

    /// Move a robot, keeping its position field and the cell index in sync.
    pub(crate) fn move_robot_to(&mut self, id: RobotId, to: GridPosition) {
        let from = self.robots[id].position;
        self.grid.relocate(Occupant::Robot(id), from, to);
        self.robots[id].position = to;
    }

    /// Move a carton, keeping its position field and the cell index in sync.
    pub(crate) fn move_carton_to(&mut self, id: CartonId, to: GridPosition) {
        let from = self.cartons[id].position;
        self.grid.relocate(Occupant::Carton(id), from, to);
        self.cartons[id].position = to;
    }

    // -----------------------------------------------------------------------
    // Tick pipeline
    // -----------------------------------------------------------------------

    /// Advance the simulation by one tick.
    ///
    /// Once the stop condition holds this is a no-op that returns a zeroed
    /// report; callers are expected to stop ticking, but re-ticking never
    /// corrupts state.
    pub fn step(&mut self) -> TickReport {
        if !self.sim_state.running {
            return TickReport::default();
        }

        // Phase 1: Clock -- the budget starts with the first tick.
        if self.sim_state.started_at.is_none() {
            self.sim_state.started_at = Some(Instant::now());
        }

        let moves_before = self.sim_state.total_moves;
        let stacked_before = self.sim_state.cartons_stacked;

        // Phase 2: Activation -- fresh uniform permutation every tick;
        // robots later in the order see earlier robots' mutations.
        let mut order: Vec<RobotId> = self.robots.keys().collect();
        self.rng.shuffle(&mut order);
        for id in order {
            self.step_robot(id);
        }

        // Phase 3: Bookkeeping.
        self.sim_state.tick += 1;
        self.finish_tick();

        // Phase 4: Post-tick -- deliver buffered events.
        self.event_bus.deliver();

        TickReport {
            counted_moves: self.sim_state.total_moves - moves_before,
            newly_stacked: self.sim_state.cartons_stacked - stacked_before,
            stopped: !self.sim_state.running,
        }
    }

    fn finish_tick(&mut self) {
        if let Some(started) = self.sim_state.started_at {
            let elapsed = started.elapsed();
            self.sim_state.elapsed_seconds = elapsed.as_secs_f64().round() as u64;
            if elapsed >= Duration::from_secs(self.config.max_time_secs) {
                self.stop(StopReason::TimeBudgetExhausted);
            }
        }
        if self.sim_state.running && self.sim_state.cartons_stacked == self.config.carton_count {
            self.stop(StopReason::AllCartonsStacked);
        }
        self.last_state_hash = self.compute_state_hash();
    }

    fn stop(&mut self, reason: StopReason) {
        if !self.sim_state.running {
            return;
        }
        self.sim_state.running = false;
        self.sim_state.stop_reason = Some(reason);
        self.event_bus.emit(Event::SimulationStopped {
            reason,
            tick: self.sim_state.tick,
        });
    }

    pub(crate) fn compute_state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_u64(self.sim_state.tick);
        hash.write_u64(self.sim_state.total_moves);
        hash.write_u32(self.sim_state.cartons_stacked);
        hash.write_u64(self.rng.state());

        for (id, robot) in &self.robots {
            hash.write_u64(id.data().as_ffi());
            hash.write_i32(robot.position.x);
            hash.write_i32(robot.position.y);
            match robot.carried {
                Some(carton) => {
                    hash.write_u32(1);
                    hash.write_u64(carton.data().as_ffi());
                }
                None => hash.write_u32(0),
            }
            match robot.target_stack {
                Some(target) => {
                    hash.write_u32(1);
                    hash.write_i32(target.x);
                    hash.write_i32(target.y);
                }
                None => hash.write_u32(0),
            }
        }

        for (id, carton) in &self.cartons {
            hash.write_u64(id.data().as_ffi());
            hash.write_i32(carton.position.x);
            hash.write_i32(carton.position.y);
            hash.write_u32(carton.carried as u32);
            hash.write_u32(carton.stacked as u32);
            hash.write_fixed64(carton.display_height);
        }

        for (pos, fill) in self.stacks.iter() {
            hash.write_i32(pos.x);
            hash.write_i32(pos.y);
            hash.write_u32(fill as u32);
        }

        hash.finish()
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Aggregate the current state into an owned snapshot.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            robots: self
                .robots
                .values()
                .map(|robot| RobotSnapshot {
                    x: robot.position.x as f64,
                    y: robot.position.y as f64,
                    carrying: robot.carried.is_some(),
                })
                .collect(),
            cartons: self
                .cartons
                .values()
                .map(|carton| CartonSnapshot {
                    x: carton.position.x as f64,
                    y: carton.position.y as f64,
                    height: fixed64_to_f64(carton.display_height),
                })
                .collect(),
            stacks: self
                .stacks
                .iter()
                .map(|(pos, fill)| StackSnapshot {
                    x: pos.x as f64,
                    y: pos.y as f64,
                    fill,
                })
                .collect(),
            running: self.sim_state.running,
            tick: self.sim_state.tick,
            total_moves: self.sim_state.total_moves,
            cartons_stacked: self.sim_state.cartons_stacked,
            elapsed_seconds: self.sim_state.elapsed_seconds,
        }
    }
}
