//! Registry of founded stacks.
//!
//! A grid position becomes a stack only when a robot commits to founding
//! one there. Fills run 1..=5; a full stack is never selected as a delivery
//! target but stays registered for the rest of the run. The number of
//! stacks is bounded by the capacity-derived limit
//! `ceil(carton_count / robot_count)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::GridPosition;

/// Maximum cartons a single stack holds.
pub const STACK_CAPACITY: u8 = 5;

/// Position-to-fill-count mapping for founded stacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackRegistry {
    fills: BTreeMap<GridPosition, u8>,
    limit: usize,
}

impl StackRegistry {
    /// Create an empty registry bounded by `limit` stacks.
    pub fn new(limit: usize) -> Self {
        Self {
            fills: BTreeMap::new(),
            limit,
        }
    }

    /// The capacity-derived maximum number of stacks.
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Whether another stack may still be founded.
    pub fn can_found(&self) -> bool {
        self.fills.len() < self.limit
    }

    /// Register a brand-new stack holding one carton.
    pub fn found(&mut self, pos: GridPosition) {
        debug_assert!(self.can_found(), "stack limit exceeded");
        debug_assert!(!self.fills.contains_key(&pos), "stack already founded here");
        self.fills.insert(pos, 1);
    }

    /// Fill count of the stack at `pos`, if one was founded there.
    pub fn fill_at(&self, pos: GridPosition) -> Option<u8> {
        self.fills.get(&pos).copied()
    }

    /// Whether the stack at `pos` is at capacity. Unfounded positions are
    /// not full.
    pub fn is_full(&self, pos: GridPosition) -> bool {
        self.fill_at(pos).is_some_and(|fill| fill >= STACK_CAPACITY)
    }

    /// Add one carton to the stack at `pos`; returns the fill count before
    /// the add (the layer the new carton rests on).
    pub fn deposit(&mut self, pos: GridPosition) -> u8 {
        debug_assert!(self.fills.contains_key(&pos), "deposit on unfounded stack");
        let fill = self.fills.entry(pos).or_insert(0);
        debug_assert!(*fill < STACK_CAPACITY, "deposit on a full stack");
        let before = *fill;
        *fill += 1;
        before
    }

    /// The stack with remaining capacity nearest to `from` by Euclidean
    /// distance. Strict less-than comparison; ties keep the first stack in
    /// key order. None when every stack is full (or none exist).
    pub fn nearest_open(&self, from: GridPosition) -> Option<GridPosition> {
        let mut best: Option<(u64, GridPosition)> = None;
        for (&pos, &fill) in &self.fills {
            if fill >= STACK_CAPACITY {
                continue;
            }
            let d = pos.distance_sq(&from);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, pos));
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Iterate over `(position, fill)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, u8)> + '_ {
        self.fills.iter().map(|(&pos, &fill)| (pos, fill))
    }

    /// Positions of all founded stacks, in key order.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.fills.keys().copied()
    }

    /// Total cartons held across all stacks.
    pub fn total_fill(&self) -> u32 {
        self.fills.values().map(|&f| f as u32).sum()
    }
}
