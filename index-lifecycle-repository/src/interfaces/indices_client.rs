//! Indices client trait definition.
//!
//! This module defines the abstract interface for index-level backend
//! operations, allowing for different backend implementations (OpenSearch,
//! Elasticsearch, in-memory mocks, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::config::DEFAULT_DOCUMENT_TYPE;
use crate::errors::IndexLifecycleError;

/// Abstracts the indices API of the underlying search backend.
///
/// Implementations are injected into `IndexManager`. Every method receives a
/// serialized request payload of the shape `{"index": <name>, ...}`, optionally
/// carrying a `body` and a `type` key, and executes exactly one backend call.
///
/// Implementations own timeout and retry policy. `IndexManager` passes their
/// errors to its caller unchanged.
#[async_trait]
pub trait IndicesClient: Send + Sync {
    /// Document type wrapping mappings in request payloads and
    /// `get_mapping` responses (`mappings.<type>`, `body.<type>`).
    ///
    /// `IndexManager` builds its payloads with this type, so the client
    /// unwrapping them and the manager wrapping them always agree.
    fn document_type(&self) -> &str {
        DEFAULT_DOCUMENT_TYPE
    }

    /// Check whether the index named in the payload exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index exists
    /// * `Ok(false)` - If the backend reports no such index
    /// * `Err(IndexLifecycleError)` - If the check could not be performed
    async fn exists(&self, payload: &Value) -> Result<bool, IndexLifecycleError>;

    /// Create an index, with the settings and mappings found in `body`, if any.
    async fn create(&self, payload: &Value) -> Result<(), IndexLifecycleError>;

    /// Delete an index.
    async fn delete(&self, payload: &Value) -> Result<(), IndexLifecycleError>;

    /// Update index settings from `body.settings`.
    async fn put_settings(&self, payload: &Value) -> Result<(), IndexLifecycleError>;

    /// Fetch index settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The raw response, keyed by index name
    ///   (`{<name>: {"settings": {"index": {...}}}}`)
    /// * `Err(IndexLifecycleError)` - If the request fails
    async fn get_settings(&self, payload: &Value) -> Result<Value, IndexLifecycleError>;

    /// Update the mapping of the document type named in `type`.
    async fn put_mapping(&self, payload: &Value) -> Result<(), IndexLifecycleError>;

    /// Fetch the index mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The raw response, keyed by index name
    ///   (`{<name>: {"mappings": {"_doc": {...}}}}`)
    /// * `Err(IndexLifecycleError)` - If the request fails
    async fn get_mapping(&self, payload: &Value) -> Result<Value, IndexLifecycleError>;

    /// Close an index, blocking reads and writes.
    async fn close(&self, payload: &Value) -> Result<(), IndexLifecycleError>;

    /// Reopen a closed index.
    async fn open(&self, payload: &Value) -> Result<(), IndexLifecycleError>;
}
