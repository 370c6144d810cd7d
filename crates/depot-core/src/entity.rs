//! Robot and carton state records.
//!
//! Both are plain data owned by the warehouse in slotmaps; all
//! cross-references go through [`RobotId`]/[`CartonId`] keys, never shared
//! pointers.

use serde::{Deserialize, Serialize};

use crate::fixed::Fixed64;
use crate::grid::GridPosition;
use crate::id::CartonId;

/// Display height of a carton while it rides with a robot. Renderers draw
/// in-transit cartons lifted above the floor plane.
pub fn in_transit_height() -> Fixed64 {
    Fixed64::from_num(3.5)
}

/// A carton of goods on the floor.
///
/// Cartons are created once at world construction and never destroyed; only
/// their state transitions. A carton is mutated exclusively by the robot
/// carrying or placing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carton {
    pub position: GridPosition,
    /// In some robot's grip.
    pub carried: bool,
    /// Consolidated into a stack; terminal for the run.
    pub stacked: bool,
    /// Render height: 0 at rest, lifted while carried, the stack layer once
    /// delivered (so cartons visually layer upward).
    pub display_height: Fixed64,
}

impl Carton {
    pub fn new(position: GridPosition) -> Self {
        Self {
            position,
            carried: false,
            stacked: false,
            display_height: Fixed64::ZERO,
        }
    }

    /// Whether a seeking robot may pick this carton up.
    pub fn is_liftable(&self) -> bool {
        !self.carried && !self.stacked
    }

    /// Mark as picked up and raise to the in-transit display height.
    pub fn lift(&mut self) {
        self.carried = true;
        self.display_height = in_transit_height();
    }

    /// Drop onto a stack (or found one) at the given layer height.
    pub fn settle(&mut self, height: Fixed64) {
        self.stacked = true;
        self.carried = false;
        self.display_height = height;
    }
}

/// A warehouse robot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub position: GridPosition,
    /// Previous cell, used only to avoid an immediate backtrack while
    /// wandering.
    pub last_position: GridPosition,
    /// The carton in this robot's grip, if any. At most one.
    pub carried: Option<CartonId>,
    /// The stack this robot is delivering toward, if any.
    pub target_stack: Option<GridPosition>,
}

impl Robot {
    pub fn new(position: GridPosition) -> Self {
        Self {
            position,
            last_position: position,
            carried: None,
            target_stack: None,
        }
    }
}
