//! Bounded 2-D floor grid with multi-occupancy cells.
//!
//! The grid is a pure cell index: it tracks which occupants sit on which
//! cell and answers 4-connected neighbor queries, clipped at the borders
//! (no wraparound). It enforces no bounds or collision rules of its own --
//! the decision logic is responsible for where entities may go, and the
//! engine keeps entity position fields and the index in sync.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{CartonId, RobotId};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A cell coordinate on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another position.
    ///
    /// Ordering-equivalent to the true distance, so greedy comparisons can
    /// stay in exact integer arithmetic.
    pub fn distance_sq(&self, other: &GridPosition) -> u64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        (dx * dx + dy * dy) as u64
    }

    /// Manhattan distance to another position.
    pub fn manhattan_distance(&self, other: &GridPosition) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }
}

/// Cardinal directions, in the order neighbor cells are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four cardinal directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
    }

    /// Offset for this direction.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// A cell occupant, discriminated by entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    Robot(RobotId),
    Carton(CartonId),
}

// ---------------------------------------------------------------------------
// FloorGrid
// ---------------------------------------------------------------------------

/// The bounded warehouse floor: a sparse position-to-occupants index.
///
/// Multiple occupants may share a cell (a robot standing on a stack cell,
/// a carried carton riding with its robot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorGrid {
    width: i32,
    height: i32,
    cells: BTreeMap<GridPosition, Vec<Occupant>>,
}

impl FloorGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            cells: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells on the floor.
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether a position lies on the floor.
    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// In-bounds 4-neighbors of a position, in N, E, S, W order.
    ///
    /// Border and corner cells yield fewer than four entries.
    pub fn neighbors4(&self, pos: GridPosition) -> Vec<GridPosition> {
        let mut out = Vec::with_capacity(4);
        for dir in Direction::all() {
            let (dx, dy) = dir.offset();
            let next = GridPosition::new(pos.x + dx, pos.y + dy);
            if self.contains(next) {
                out.push(next);
            }
        }
        out
    }

    /// The occupants of a cell. Empty slice for free cells.
    pub fn occupants_at(&self, pos: GridPosition) -> &[Occupant] {
        self.cells.get(&pos).map_or(&[], Vec::as_slice)
    }

    /// Whether a cell has no occupants.
    pub fn is_free(&self, pos: GridPosition) -> bool {
        self.occupants_at(pos).is_empty()
    }

    /// Add an occupant to a cell.
    pub fn place(&mut self, occupant: Occupant, pos: GridPosition) {
        self.cells.entry(pos).or_default().push(occupant);
    }

    /// Move an occupant between cells, preserving the order of the
    /// remaining occupants on the source cell. Same-cell moves are no-ops.
    pub fn relocate(&mut self, occupant: Occupant, from: GridPosition, to: GridPosition) {
        if from == to {
            return;
        }
        self.remove_at(occupant, from);
        self.place(occupant, to);
    }

    fn remove_at(&mut self, occupant: Occupant, pos: GridPosition) {
        if let Some(cell) = self.cells.get_mut(&pos) {
            if let Some(i) = cell.iter().position(|&o| o == occupant) {
                cell.remove(i);
            }
            if cell.is_empty() {
                self.cells.remove(&pos);
            }
        }
    }

    /// Total occupants across all cells.
    pub fn occupant_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}
