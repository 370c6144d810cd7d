//! Depot Core -- the simulation engine for warehouse consolidation runs.
//!
//! Robots roam a bounded 2-D floor grid, pick up scattered cartons, and
//! consolidate them into capacity-bounded stacks before a wall-clock time
//! budget runs out.
//!
//! # Four-Phase Tick Pipeline
//!
//! Each call to [`engine::Warehouse::step`] advances the simulation by one
//! tick through the following phases:
//!
//! 1. **Clock** -- On the very first tick, start the wall clock.
//! 2. **Activation** -- Shuffle the robot order, then run each robot's
//!    decision step strictly sequentially. A robot activated later in the
//!    tick observes grid and stack mutations already made by earlier robots.
//! 3. **Bookkeeping** -- Increment the tick counter, refresh elapsed time,
//!    evaluate the stop condition, and recompute the state hash.
//! 4. **Post-tick** -- Deliver buffered events to subscribers.
//!
//! # Robot Behavior
//!
//! A robot's mode is derived fresh each tick from its own state -- there is
//! no persisted mode field:
//!
//! - **Seeking**: no carton in hand; pick up the first liftable carton found
//!   among the 4-neighbors, or wander to a random free neighbor.
//! - **Founding**: carrying a carton while fewer stacks exist than the
//!   capacity-derived target; the carton becomes a brand-new stack where it
//!   sits.
//! - **Delivering**: carrying a carton once all stacks are founded; step
//!   greedily toward the nearest stack with remaining capacity.
//!
//! # Key Types
//!
//! - [`engine::Warehouse`] -- Main simulation engine and tick orchestrator.
//! - [`grid::FloorGrid`] -- Bounded multi-occupancy cell index with
//!   4-connected neighbor queries.
//! - [`stack::StackRegistry`] -- Position-to-fill-count mapping for founded
//!   stacks, bounded by the capacity-derived stack limit.
//! - [`config::SimConfig`] -- Run parameters, validated at construction.
//! - [`rng::SimRng`] -- Instance-local seedable PRNG; runs are reproducible
//!   given a fixed seed.
//! - [`event::EventBus`] -- Buffered simulation events with per-kind
//!   suppression.
//! - [`query::WorldSnapshot`] -- Owned read-only view for renderers and
//!   service layers.

mod behavior;
pub mod config;
pub mod engine;
pub mod entity;
pub mod event;
pub mod fixed;
pub mod grid;
pub mod id;
pub mod query;
pub mod rng;
pub mod sim;
pub mod stack;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
