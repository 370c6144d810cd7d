//! Run parameters and construction-time validation.

use serde::{Deserialize, Serialize};

/// Parameters for one simulation run.
///
/// Defaults match the reference floor: a 20x20 grid, 15 cartons, 5 robots,
/// and a 30 second wall-clock budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Floor width in cells.
    pub width: u32,
    /// Floor height in cells.
    pub height: u32,
    /// Cartons scattered at construction.
    pub carton_count: u32,
    /// Robots scattered at construction.
    pub robot_count: u32,
    /// Wall-clock budget; the run stops once this much time has elapsed.
    pub max_time_secs: u64,
    /// Seed for the instance-local PRNG. Equal seeds reproduce equal runs.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            carton_count: 15,
            robot_count: 5,
            max_time_secs: 30,
            seed: 0,
        }
    }
}

/// Rejected construction parameters. Construction fails fast; entity counts
/// are never silently truncated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("floor dimensions must be nonzero (got {width}x{height})")]
    EmptyFloor { width: u32, height: u32 },

    #[error("at least one robot is required")]
    NoRobots,

    #[error("{robots} robots and {cartons} cartons will not fit on {cells} cells")]
    Overcrowded { robots: u32, cartons: u32, cells: u64 },
}

impl SimConfig {
    /// Check that a floor can actually be built from these parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyFloor {
                width: self.width,
                height: self.height,
            });
        }
        if self.robot_count == 0 {
            return Err(ConfigError::NoRobots);
        }
        let cells = self.width as u64 * self.height as u64;
        let entities = self.robot_count as u64 + self.carton_count as u64;
        if entities > cells {
            return Err(ConfigError::Overcrowded {
                robots: self.robot_count,
                cartons: self.carton_count,
                cells,
            });
        }
        Ok(())
    }

    /// Target stack count: `ceil(carton_count / robot_count)`.
    ///
    /// Robots found stacks opportunistically until this many exist, then
    /// deliver into them.
    pub fn amount_stacks(&self) -> usize {
        debug_assert!(self.robot_count > 0);
        self.carton_count.div_ceil(self.robot_count) as usize
    }
}
