//! Typed simulation events with buffered delivery.
//!
//! Events are emitted during the activation phase and delivered in batch
//! during post-tick. Event kinds can be suppressed, which drops them before
//! they are buffered.

use crate::fixed::Ticks;
use crate::grid::GridPosition;
use crate::id::{CartonId, RobotId};
use crate::sim::StopReason;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the tick during which they occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A seeking robot lifted a carton off the floor.
    CartonPicked {
        robot: RobotId,
        carton: CartonId,
        at: GridPosition,
        tick: Ticks,
    },

    /// A carried carton became a brand-new one-carton stack.
    StackFounded { at: GridPosition, tick: Ticks },

    /// A carried carton was delivered onto an existing stack.
    CartonDelivered {
        carton: CartonId,
        at: GridPosition,
        /// Fill count of the stack after the delivery.
        fill: u8,
        tick: Ticks,
    },

    /// A robot had nowhere to go this tick (wander candidates exhausted, or
    /// boxed in while delivering).
    RobotStalled { robot: RobotId, tick: Ticks },

    /// The stop condition was reached.
    SimulationStopped { reason: StopReason, tick: Ticks },
}

/// Discriminant tag for event types, used for suppression and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CartonPicked,
    StackFounded,
    CartonDelivered,
    RobotStalled,
    SimulationStopped,
}

/// Total number of event kinds.
const EVENT_KIND_COUNT: usize = 5;

impl Event {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::CartonPicked { .. } => EventKind::CartonPicked,
            Event::StackFounded { .. } => EventKind::StackFounded,
            Event::CartonDelivered { .. } => EventKind::CartonDelivered,
            Event::RobotStalled { .. } => EventKind::RobotStalled,
            Event::SimulationStopped { .. } => EventKind::SimulationStopped,
        }
    }
}

impl EventKind {
    /// Convert to usize index for array lookups.
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

/// Buffered event bus: events emitted mid-tick are held until the post-tick
/// phase, then handed to the listeners subscribed to their kind.
#[derive(Default)]
pub struct EventBus {
    pending: Vec<Event>,
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: [Vec<PassiveListener>; EVENT_KIND_COUNT],
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending)
            .field("suppressed", &self.suppressed)
            .field(
                "listeners",
                &self.listeners.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress an event kind. Suppressed events are never buffered.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
    }

    /// Re-enable a suppressed event kind.
    pub fn unsuppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = false;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Subscribe a passive listener to one event kind.
    pub fn on(&mut self, kind: EventKind, listener: PassiveListener) {
        self.listeners[kind.index()].push(listener);
    }

    /// Record an event for delivery at the end of the tick.
    pub fn emit(&mut self, event: Event) {
        if self.suppressed[event.kind().index()] {
            return;
        }
        self.pending.push(event);
    }

    /// Number of events waiting for delivery.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Deliver all buffered events to their subscribers, draining the
    /// buffer. Events reach listeners in emission order.
    pub fn deliver(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for event in &pending {
            for listener in &mut self.listeners[event.kind().index()] {
                listener(event);
            }
        }
    }
}
