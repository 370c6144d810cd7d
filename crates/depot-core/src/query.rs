//! Read-only snapshot types for inspecting simulation state.
//!
//! All types are owned copies -- no references into internal warehouse
//! storage. Suitable for renderers, service layers, and serialization
//! (everything derives `serde::Serialize`; the wire format is the
//! consumer's business).

use serde::Serialize;

use crate::fixed::Ticks;

/// One robot's position, plus whether it has a carton in its grip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RobotSnapshot {
    pub x: f64,
    pub y: f64,
    pub carrying: bool,
}

/// One carton's position and current display height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartonSnapshot {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

/// One founded stack's position and fill count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackSnapshot {
    pub x: f64,
    pub y: f64,
    pub fill: u8,
}

/// Aggregated view of a warehouse at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub robots: Vec<RobotSnapshot>,
    pub cartons: Vec<CartonSnapshot>,
    pub stacks: Vec<StackSnapshot>,
    /// False once the stop condition has been reached.
    pub running: bool,
    pub tick: Ticks,
    pub total_moves: u64,
    pub cartons_stacked: u32,
    pub elapsed_seconds: u64,
}
