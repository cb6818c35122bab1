//! Errors raised at the boundary of the rig: parsing external payloads and loading or
//! saving snapshots. The solvers and the cloth simulator never fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RigError {
    /// Pose suggestion payload could not be parsed.
    #[error("malformed pose suggestion: {0}")]
    MalformedSuggestion(#[source] serde_json::Error),

    /// Pose suggestion parsed but named no targets.
    #[error("pose suggestion '{0}' has no targets")]
    EmptySuggestion(String),

    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate for {0}")]
    NonFiniteCoordinate(String),

    #[error("unknown limb: {0}")]
    UnknownLimb(String),

    /// Snapshot or settings JSON could not be read or written.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RigError>;
