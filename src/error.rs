//! Error types for the engine core
//!
//! Every failure the core can report is a variant of [`EngineError`]. Most of
//! them degrade gracefully: a failed entity draw skips that entity for one
//! frame, a missing follow target leaves the camera where it is, and a
//! restricted surface read skips the grayscale effect.

use thiserror::Error;

/// Errors produced by entities, the scene controller and their collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A sprite entity was drawn before any image was bound to it.
    #[error("object has no image (entity {id:?})")]
    MissingImageResource {
        /// Caller-assigned id of the entity, if any
        id: Option<String>,
    },

    /// Following was requested but the target entity no longer exists.
    #[error("there is no object to follow")]
    NoFollowTarget,

    /// Pixel data could not be read back from the surface.
    ///
    /// Happens once a tainted (cross-origin) image has been drawn onto it.
    #[error("surface pixels cannot be read: the surface is tainted by a cross-origin image")]
    SurfaceReadRestricted,

    /// A configuration broke one of the entity/engine invariants.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The state machine has no state with this name.
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// Reading a config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a config file failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The windowing/presentation platform reported an error.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Convenience alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<EngineError> for String {
    fn from(error: EngineError) -> Self {
        error.to_string()
    }
}
