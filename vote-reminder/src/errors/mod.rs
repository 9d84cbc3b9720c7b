//! Error types for the vote reminder service.

use thiserror::Error;
use vote_reminder_pipeline::TrackerError;

/// Errors that can occur during service startup or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The vote tracker failed to start.
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// The HTTP listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
