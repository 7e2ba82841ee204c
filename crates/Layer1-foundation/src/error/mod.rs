//! Error types for taskd
//!
//! Every crate reports failures through this one enum.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// taskd error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Tasks
    // ========================================================================
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Work failed: {0}")]
    Work(String),

    // ========================================================================
    // Id issuing
    // ========================================================================
    #[error("Failed to generate task id: {0}")]
    IdGeneration(String),

    #[error("Task id collision: {0}")]
    IdCollision(String),

    // ========================================================================
    // Caller input
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Unknown or already reaped task
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Helper for state machine violations
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
