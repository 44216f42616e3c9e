//! # Index Lifecycle Repository
//!
//! This crate manages the lifecycle of search indices: existence checks,
//! creation, deletion, and settings and mapping updates, including the
//! close/update/reopen sequence for settings that require a closed index.
//!
//! It includes a schema-less [`Payload`] builder for request bodies, the
//! [`IndicesClient`] abstraction over the backend, the [`IndexManager`]
//! that drives it, and a concrete client for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod manager;
pub mod opensearch;
pub mod payload;
pub mod types;
pub mod utils;

pub use config::DEFAULT_DOCUMENT_TYPE;
pub use errors::{Bundle, IndexLifecycleError};
pub use interfaces::IndicesClient;
pub use manager::IndexManager;
pub use opensearch::OpenSearchIndices;
pub use payload::Payload;
pub use types::{Index, SettingsUpdatePhase};
pub use utils::value_at_path;
