//! # Index Lifecycle
//!
//! Operator binary for search indices. It loads an index definition, connects
//! to OpenSearch and runs a single lifecycle action through
//! [`index_lifecycle_repository::IndexManager`].
//!
//! ## Modules
//!
//! - [`action`]: The lifecycle actions and their execution
//! - [`config`]: Environment configuration and dependency initialization
//! - [`errors`]: Error types for the binary

pub mod action;
pub mod config;
pub mod errors;

pub use action::{run_action, Action, ActionOutcome};
pub use config::{Dependencies, LifecycleConfig};
pub use errors::LifecycleError;
