//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Every variant is recoverable: a rejected operation leaves the engine
/// exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// No source is currently loaded
    #[error("please load a source first")]
    NoSourceLoaded,

    /// Operation does not apply to the loaded source type
    #[error("{0}")]
    InvalidModeForSourceType(String),

    /// Empty collections cannot be loaded
    #[error("cannot load an empty source")]
    EmptySource,

    /// Index out of bounds
    #[error("index out of range: {0}")]
    OutOfRange(usize),

    /// No engine exists for this user
    #[error("the username {0} doesn't exist")]
    UnknownUser(String),

    /// The simulated clock only moves forward
    #[error("timestamp moved backwards: {requested} < {current}")]
    TimestampRegression { requested: u64, current: u64 },
}

impl PlaybackError {
    /// Create an invalid-mode error with a specific description
    pub fn invalid_mode(msg: impl Into<String>) -> Self {
        Self::InvalidModeForSourceType(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
