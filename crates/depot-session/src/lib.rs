//! Session layer for the depot engine.
//!
//! Owns independent warehouse simulations keyed by opaque session ids and
//! exposes the one-tick-per-request contract a service front end needs:
//! create a simulation, advance it by exactly one tick, and hand back an
//! owned snapshot. Scenario presets are loaded from RON data files. No wire
//! format lives here -- snapshots serialize with serde and the transport is
//! the caller's business.
//!
//! # Usage
//!
//! ```rust,ignore
//! use depot_core::config::SimConfig;
//! use depot_session::SessionManager;
//!
//! let mut sessions = SessionManager::new();
//! let id = sessions.create(SimConfig::default())?;
//! let snapshot = sessions.advance_and_snapshot(id)?;
//! ```

pub mod error;
pub mod scenario;
pub mod session;

pub use error::SessionError;
pub use scenario::{ScenarioEntry, ScenarioSet, load_scenarios};
pub use session::{SessionId, SessionManager};
