//! Error types for the index lifecycle repository.
//!
//! This module provides a unified error type for all index lifecycle operations.

mod index_lifecycle_error;

pub use index_lifecycle_error::{Bundle, IndexLifecycleError};
