use std::path::PathBuf;

use depot_core::config::ConfigError;

/// Errors that can occur in the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session id does not resolve to a live simulation.
    #[error("unknown session")]
    UnknownSession,

    /// The requested scenario was not found in the scenario set.
    #[error("scenario '{id}' not found")]
    ScenarioNotFound { id: String },

    /// The simulation rejected its construction parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to parse a scenario file.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
