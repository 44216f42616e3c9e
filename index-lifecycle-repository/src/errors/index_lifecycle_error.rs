//! Index lifecycle error types.
//!
//! This module defines the unified error type for index lifecycle operations,
//! covering payload construction, local guards, and failures reported by an
//! `IndicesClient` implementation.

use std::fmt;

use thiserror::Error;

/// The configuration bundle of an index that an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bundle {
    /// Index-level settings.
    Settings,
    /// Field mapping schema.
    Mapping,
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings => f.write_str("settings"),
            Self::Mapping => f.write_str("mapping"),
        }
    }
}

/// Unified errors from index lifecycle operations.
///
/// `PayloadEmpty` and `InvalidScope` are raised locally by this crate. The
/// remaining variants are produced by `IndicesClient` implementations and are
/// passed through `IndexManager` unchanged.
#[derive(Debug, Clone, Error)]
pub enum IndexLifecycleError {
    /// A required settings or mapping bundle has no configured keys.
    #[error("{index} {bundle} payload is empty")]
    PayloadEmpty { index: String, bundle: Bundle },

    /// `end()` was called on a root payload scope.
    #[error("Invalid scope: cannot end the root payload scope")]
    InvalidScope,

    /// Validation error (e.g., empty index name, malformed payload).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The search backend rejected a request.
    #[error("Backend error during {operation} (status {status}): {body}")]
    BackendError {
        operation: String,
        status: u16,
        body: String,
    },

    /// Failed to parse a response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IndexLifecycleError {
    /// Create a payload empty error for the given index and bundle.
    pub fn payload_empty(index: impl Into<String>, bundle: Bundle) -> Self {
        Self::PayloadEmpty {
            index: index.into(),
            bundle,
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a backend error for a rejected request.
    pub fn backend(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::BackendError {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}
