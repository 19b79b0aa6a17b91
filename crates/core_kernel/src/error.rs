//! Startup and parsing failures that are not tied to a store

use thiserror::Error;

use crate::temporal::TemporalError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// Rejected settings, reported before the server binds
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }
}
