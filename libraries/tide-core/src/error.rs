/// Core error types for Tide Player
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for catalog operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Entity not found
    #[error("{entity} not found: {name}")]
    NotFound { entity: String, name: String },

    /// Duplicate entry
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            name: name.into(),
        }
    }

    /// Create a duplicate entry error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
