use slotmap::{SlotMap, new_key_type};

use depot_core::config::SimConfig;
use depot_core::engine::Warehouse;
use depot_core::query::WorldSnapshot;

use crate::error::SessionError;
use crate::scenario::ScenarioSet;

new_key_type! {
    /// Opaque handle to one simulation owned by a [`SessionManager`].
    pub struct SessionId;
}

/// Owns independent warehouse simulations, one per client session.
///
/// Sessions share nothing: each warehouse has its own grid, entities, and
/// RNG, so ticks on different sessions may run concurrently (see
/// [`SessionManager::step_all`]) while a single session must only ever be
/// ticked from one place at a time -- which the `&mut self` receivers
/// enforce.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: SlotMap<SessionId, Warehouse>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh simulation and return its opaque id.
    pub fn create(&mut self, config: SimConfig) -> Result<SessionId, SessionError> {
        let world = Warehouse::new(config)?;
        Ok(self.sessions.insert(world))
    }

    /// Create a fresh simulation from a named scenario preset.
    pub fn create_from_scenario(
        &mut self,
        set: &ScenarioSet,
        scenario_id: &str,
    ) -> Result<SessionId, SessionError> {
        let entry = set
            .scenarios
            .iter()
            .find(|s| s.id == scenario_id)
            .ok_or_else(|| SessionError::ScenarioNotFound {
                id: scenario_id.to_string(),
            })?;
        self.create(entry.config.clone())
    }

    /// Advance the session by exactly one tick, then snapshot it.
    ///
    /// Advancing a stopped simulation leaves it untouched; the returned
    /// snapshot simply reflects the final state again.
    pub fn advance_and_snapshot(&mut self, id: SessionId) -> Result<WorldSnapshot, SessionError> {
        let world = self
            .sessions
            .get_mut(id)
            .ok_or(SessionError::UnknownSession)?;
        world.step();
        Ok(world.snapshot())
    }

    /// Snapshot a session without advancing it.
    pub fn snapshot(&self, id: SessionId) -> Result<WorldSnapshot, SessionError> {
        self.sessions
            .get(id)
            .map(Warehouse::snapshot)
            .ok_or(SessionError::UnknownSession)
    }

    /// Read access to a live simulation.
    pub fn get(&self, id: SessionId) -> Option<&Warehouse> {
        self.sessions.get(id)
    }

    /// Drop a session. Returns true if it existed.
    pub fn discard(&mut self, id: SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drop every stopped session; returns how many were discarded.
    pub fn prune_stopped(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, world| world.is_running());
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of all live sessions.
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.keys().collect()
    }

    /// Tick every session once. Instances share nothing, so the ticks run
    /// in parallel.
    #[cfg(feature = "parallel")]
    pub fn step_all(&mut self) {
        use rayon::iter::{ParallelBridge, ParallelIterator};
        self.sessions.values_mut().par_bridge().for_each(|world| {
            world.step();
        });
    }

    /// Tick every session once, sequentially.
    #[cfg(not(feature = "parallel"))]
    pub fn step_all(&mut self) {
        for world in self.sessions.values_mut() {
            world.step();
        }
    }
}
