//! Error types for the index lifecycle binary.

use index_lifecycle_repository::IndexLifecycleError;
use thiserror::Error;

/// Errors that can occur during configuration or while running an action.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Index lifecycle operation error.
    #[error("Index lifecycle error: {0}")]
    IndexError(#[from] IndexLifecycleError),
}

impl LifecycleError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
