//! Per-tick robot decision logic.
//!
//! A robot's mode is derived fresh every tick from its own fields, in this
//! order:
//!
//! - **Seeking** -- no carton in hand: grab the first liftable carton among
//!   the 4-neighbors, otherwise wander to a random free neighbor (avoiding
//!   an immediate backtrack).
//! - **Founding** -- carrying, and fewer stacks exist than the
//!   capacity-derived limit: the carried carton becomes a new one-carton
//!   stack right where it sits.
//! - **Delivering** -- carrying, all stacks founded: step greedily toward
//!   the nearest stack with remaining capacity.
//!
//! Movement is single-step greedy with no path search. On a small, lightly
//! occupied floor that is enough; in pathological occupancy configurations
//! a delivering robot can oscillate or stall until the clock runs out.
//! Known limitation, kept as-is.

use crate::engine::Warehouse;
use crate::event::Event;
use crate::fixed::Fixed64;
use crate::grid::{GridPosition, Occupant};
use crate::id::{CartonId, RobotId};

/// Outcome of one robot's decision step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Move to the given cell; counts toward the move total.
    MoveTo(GridPosition),
    /// Stay in place; the move is not counted.
    Stay,
}

impl Warehouse {
    /// Run one robot's decision step and apply its movement.
    pub(crate) fn step_robot(&mut self, id: RobotId) {
        let neighbors = self.grid.neighbors4(self.robots[id].position);
        let carried = self.robots[id].carried;
        let action = match carried {
            None => self.seek(id, &neighbors),
            Some(carton) if self.stacks.can_found() => self.found_stack(id, carton, &neighbors),
            Some(carton) => self.deliver(id, carton, &neighbors),
        };
        match action {
            Action::MoveTo(to) => {
                self.move_robot_to(id, to);
                self.sim_state.total_moves += 1;
            }
            Action::Stay => {}
        }
    }

    // -----------------------------------------------------------------------
    // Seeking
    // -----------------------------------------------------------------------

    fn seek(&mut self, id: RobotId, neighbors: &[GridPosition]) -> Action {
        let mut wander: Vec<GridPosition> = Vec::with_capacity(4);
        for &cell in neighbors {
            let occupants = self.grid.occupants_at(cell);
            if occupants.is_empty() {
                wander.push(cell);
                continue;
            }
            // First liftable carton in scan order wins, even when the cell
            // also holds a robot.
            let liftable = occupants.iter().find_map(|occupant| match occupant {
                Occupant::Carton(carton) if self.cartons[*carton].is_liftable() => Some(*carton),
                _ => None,
            });
            if let Some(carton) = liftable {
                return self.pick_up(id, carton, cell);
            }
        }

        // Nothing to grab: wander. Dropping last_position is best-effort --
        // it may not be a candidate at all.
        let robot = &mut self.robots[id];
        let last = robot.last_position;
        wander.retain(|&cell| cell != last);
        robot.last_position = robot.position;

        match self.rng.choose(&wander).copied() {
            Some(cell) => Action::MoveTo(cell),
            None => {
                self.event_bus.emit(Event::RobotStalled {
                    robot: id,
                    tick: self.sim_state.tick,
                });
                Action::Stay
            }
        }
    }

    fn pick_up(&mut self, id: RobotId, carton: CartonId, cell: GridPosition) -> Action {
        self.robots[id].carried = Some(carton);
        // The carton already sits on `cell`; only the robot moves onto it.
        self.cartons[carton].lift();
        self.event_bus.emit(Event::CartonPicked {
            robot: id,
            carton,
            at: cell,
            tick: self.sim_state.tick,
        });
        Action::MoveTo(cell)
    }

    // -----------------------------------------------------------------------
    // Founding
    // -----------------------------------------------------------------------

    fn found_stack(&mut self, id: RobotId, carton: CartonId, neighbors: &[GridPosition]) -> Action {
        let site = self.cartons[carton].position;
        self.stacks.found(site);
        self.cartons[carton].settle(Fixed64::ZERO);
        self.sim_state.cartons_stacked += 1;
        self.robots[id].carried = None;
        self.event_bus.emit(Event::StackFounded {
            at: site,
            tick: self.sim_state.tick,
        });

        // The robot walks off the founding site; any neighbor will do,
        // occupied or not.
        match self.rng.choose(neighbors).copied() {
            Some(cell) => Action::MoveTo(cell),
            None => Action::Stay,
        }
    }

    // -----------------------------------------------------------------------
    // Delivering
    // -----------------------------------------------------------------------

    fn deliver(&mut self, id: RobotId, carton: CartonId, neighbors: &[GridPosition]) -> Action {
        // Retarget when no target is set or the current one filled up.
        let target = match self.robots[id]
            .target_stack
            .filter(|&t| !self.stacks.is_full(t))
        {
            Some(t) => t,
            None => {
                let carton_pos = self.cartons[carton].position;
                let Some(t) = self.stacks.nearest_open(carton_pos) else {
                    // Every stack is at capacity; nowhere to deliver. Hold
                    // position until the clock runs out.
                    self.event_bus.emit(Event::RobotStalled {
                        robot: id,
                        tick: self.sim_state.tick,
                    });
                    return Action::Stay;
                };
                self.robots[id].target_stack = Some(t);
                t
            }
        };

        // Greedy step: occupied cells are off-limits unless they are the
        // target itself. Strict less-than keeps the first minimum in scan
        // order.
        let mut best: Option<(u64, GridPosition)> = None;
        for &cell in neighbors {
            if cell != target && !self.grid.occupants_at(cell).is_empty() {
                continue;
            }
            let d = cell.distance_sq(&target);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, cell));
            }
        }
        let Some((dist, cell)) = best else {
            // Boxed in on all sides; wait for the jam to clear.
            self.event_bus.emit(Event::RobotStalled {
                robot: id,
                tick: self.sim_state.tick,
            });
            return Action::Stay;
        };

        // The carton rides along every step, including the final one onto
        // the stack cell.
        self.move_carton_to(carton, cell);

        if dist == 0 {
            // The chosen cell is the target: finalize the delivery. The
            // robot stays where it is and the move is not counted.
            let layer = self.stacks.deposit(cell);
            self.cartons[carton].settle(Fixed64::from_num(layer));
            self.sim_state.cartons_stacked += 1;
            self.robots[id].carried = None;
            self.robots[id].target_stack = None;
            self.event_bus.emit(Event::CartonDelivered {
                carton,
                at: cell,
                fill: layer + 1,
                tick: self.sim_state.tick,
            });
            Action::Stay
        } else {
            Action::MoveTo(cell)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::STACK_CAPACITY;
    use crate::test_utils::*;

    #[test]
    fn seeking_picks_the_first_carton_in_scan_order() {
        // Cartons to the north and east; north is scanned first.
        let mut world = FloorBuilder::new(10, 10)
            .robot_at(5, 5)
            .carton_at(5, 4)
            .carton_at(6, 5)
            .build();
        let robot = robot_ids(&world)[0];

        world.step_robot(robot);

        let held = world.robot(robot).unwrap().carried.expect("picked up");
        let carton = world.carton(held).unwrap();
        assert_eq!(carton.position, pos(5, 4));
        assert!(carton.carried);
        assert_eq!(carton.display_height, crate::entity::in_transit_height());
        assert_eq!(world.robot(robot).unwrap().position, pos(5, 4));
        assert_eq!(world.sim_state.total_moves, 1);
    }

    #[test]
    fn seeking_ignores_stacked_cartons() {
        let mut world = FloorBuilder::new(10, 10)
            .robot_at(5, 5)
            .pile_at(5, 4, 1)
            .carton_at(8, 8)
            .stack_limit(1)
            .build();
        let robot = robot_ids(&world)[0];

        world.step_robot(robot);

        assert!(world.robot(robot).unwrap().carried.is_none());
        // The stack cell is occupied, so the robot wandered elsewhere.
        assert_ne!(world.robot(robot).unwrap().position, pos(5, 4));
    }

    #[test]
    fn wandering_updates_last_position() {
        let mut world = FloorBuilder::new(10, 10).robot_at(5, 5).build();
        let robot = robot_ids(&world)[0];

        world.step_robot(robot);

        let r = world.robot(robot).unwrap();
        assert_eq!(r.last_position, pos(5, 5));
        assert_eq!(r.position.manhattan_distance(&pos(5, 5)), 1);
    }

    #[test]
    fn boxed_in_wanderer_stays_without_counting() {
        // Corner robot with both exits blocked by stacked piles.
        let mut world = FloorBuilder::new(10, 10)
            .robot_at(0, 0)
            .pile_at(1, 0, 1)
            .pile_at(0, 1, 1)
            .carton_at(9, 9)
            .stack_limit(2)
            .build();
        let robot = robot_ids(&world)[0];

        world.step_robot(robot);

        assert_eq!(world.robot(robot).unwrap().position, pos(0, 0));
        assert_eq!(world.sim_state.total_moves, 0);
    }

    #[test]
    fn founding_converts_the_carried_carton_in_place() {
        let mut world = FloorBuilder::new(10, 10)
            .robot_at(4, 4)
            .carton_at(7, 7)
            .build();
        let robot = robot_ids(&world)[0];
        let carton = carton_ids(&world)[0];
        hand_carton(&mut world, robot, carton);

        world.step_robot(robot);

        assert_eq!(world.stacks().fill_at(pos(4, 4)), Some(1));
        let c = world.carton(carton).unwrap();
        assert!(c.stacked);
        assert!(!c.carried);
        assert_eq!(c.display_height, Fixed64::ZERO);
        assert_eq!(c.position, pos(4, 4));
        assert_eq!(world.sim_state.cartons_stacked, 1);

        // The robot dropped the carton and stepped off the site.
        let r = world.robot(robot).unwrap();
        assert!(r.carried.is_none());
        assert_eq!(r.position.manhattan_distance(&pos(4, 4)), 1);
        assert_eq!(world.sim_state.total_moves, 1);
    }

    #[test]
    fn delivering_steps_toward_the_nearest_open_stack() {
        let mut world = FloorBuilder::new(12, 12)
            .robot_at(2, 2)
            .carton_at(2, 2)
            .pile_at(6, 2, 1)
            .stack_limit(1)
            .build();
        let robot = robot_ids(&world)[0];
        let carton = carton_ids(&world)[0];
        hand_carton(&mut world, robot, carton);

        world.step_robot(robot);

        let r = world.robot(robot).unwrap();
        assert_eq!(r.position, pos(3, 2));
        assert_eq!(r.target_stack, Some(pos(6, 2)));
        assert!(r.carried.is_some());
        // The carton rides along.
        assert_eq!(world.carton(carton).unwrap().position, pos(3, 2));
        assert_eq!(world.sim_state.total_moves, 1);
    }

    #[test]
    fn delivering_routes_around_blocked_cells() {
        let mut world = FloorBuilder::new(12, 12)
            .robot_at(2, 2)
            .carton_at(2, 2)
            .carton_at(3, 2) // blocks the straight-line step east
            .pile_at(4, 2, 1)
            .stack_limit(1)
            .build();
        let robot = robot_ids(&world)[0];
        let carton = carton_ids(&world)[0];
        hand_carton(&mut world, robot, carton);

        world.step_robot(robot);

        // North and south tie at distance sqrt(5); north is scanned first.
        assert_eq!(world.robot(robot).unwrap().position, pos(2, 1));
    }

    #[test]
    fn delivery_onto_an_adjacent_stack_finalizes_without_moving() {
        let mut world = FloorBuilder::new(12, 12)
            .robot_at(10, 11)
            .carton_at(10, 11)
            .pile_at(10, 10, STACK_CAPACITY - 1)
            .stack_limit(1)
            .build();
        let robot = robot_ids(&world)[0];
        let carton = carton_ids(&world)[0];
        hand_carton(&mut world, robot, carton);
        set_target(&mut world, robot, pos(10, 10));

        world.step_robot(robot);

        assert_eq!(world.stacks().fill_at(pos(10, 10)), Some(STACK_CAPACITY));
        let c = world.carton(carton).unwrap();
        assert!(c.stacked);
        assert!(!c.carried);
        assert_eq!(c.position, pos(10, 10));
        // The new carton rests on top of the four below it.
        assert_eq!(c.display_height, Fixed64::from_num(STACK_CAPACITY - 1));

        let r = world.robot(robot).unwrap();
        assert_eq!(r.position, pos(10, 11));
        assert!(r.carried.is_none());
        assert!(r.target_stack.is_none());
        assert_eq!(world.sim_state.total_moves, 0);
    }

    #[test]
    fn full_target_triggers_a_retarget() {
        let mut world = FloorBuilder::new(12, 12)
            .robot_at(2, 2)
            .carton_at(2, 2)
            .pile_at(3, 2, STACK_CAPACITY)
            .pile_at(8, 2, 1)
            .stack_limit(2)
            .build();
        let robot = robot_ids(&world)[0];
        let carton = carton_ids(&world)[0];
        hand_carton(&mut world, robot, carton);
        set_target(&mut world, robot, pos(3, 2));

        world.step_robot(robot);

        assert_eq!(world.robot(robot).unwrap().target_stack, Some(pos(8, 2)));
    }

    #[test]
    fn all_stacks_full_means_hold_position() {
        let mut world = FloorBuilder::new(12, 12)
            .robot_at(2, 2)
            .carton_at(2, 2)
            .pile_at(6, 6, STACK_CAPACITY)
            .stack_limit(1)
            .build();
        let robot = robot_ids(&world)[0];
        let carton = carton_ids(&world)[0];
        hand_carton(&mut world, robot, carton);

        world.step_robot(robot);

        let r = world.robot(robot).unwrap();
        assert_eq!(r.position, pos(2, 2));
        assert!(r.carried.is_some());
        assert!(r.target_stack.is_none());
        assert_eq!(world.sim_state.total_moves, 0);
    }

    #[test]
    fn boxed_in_deliverer_keeps_its_carton() {
        let mut world = FloorBuilder::new(12, 12)
            .robot_at(0, 0)
            .carton_at(0, 0)
            .carton_at(1, 0)
            .carton_at(0, 1)
            .pile_at(9, 9, 1)
            .stack_limit(1)
            .build();
        let robot = robot_ids(&world)[0];
        let carton = carton_ids(&world)[0];
        hand_carton(&mut world, robot, carton);

        world.step_robot(robot);

        let r = world.robot(robot).unwrap();
        assert_eq!(r.position, pos(0, 0));
        assert!(r.carried.is_some());
        assert_eq!(world.carton(carton).unwrap().position, pos(0, 0));
        assert_eq!(world.sim_state.total_moves, 0);
    }
}
