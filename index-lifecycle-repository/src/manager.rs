//! Index lifecycle manager implementation.
//!
//! This module provides the main entry point for managing search indices:
//! existence checks, creation, deletion and settings/mapping updates. Request
//! bodies are assembled with [`Payload`] and executed through an injected
//! [`IndicesClient`].
//!
//! # Forced settings updates
//!
//! Some settings (analyzers, static index parameters) are only accepted while
//! an index is closed. [`IndexManager::put_settings`] with `force = true`
//! closes the index, applies the settings and reopens it, one call at a time.
//! There is no rollback: if the settings call fails after a successful close,
//! the index stays closed and the error is returned to the caller.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::errors::{Bundle, IndexLifecycleError};
use crate::interfaces::IndicesClient;
use crate::payload::Payload;
use crate::types::{Index, SettingsUpdatePhase};
use crate::utils::value_at_path;

/// Manages the lifecycle of search indices against a backend.
///
/// Every operation issues its backend calls sequentially and propagates
/// client errors unchanged. Callers must not mutate the same index
/// concurrently while a forced settings update is in progress.
///
/// # Example
///
/// ```no_run
/// use index_lifecycle_repository::opensearch::OpenSearchIndices;
/// use index_lifecycle_repository::{Index, IndexManager};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OpenSearchIndices::new("http://localhost:9200")?;
/// let manager = IndexManager::new(Box::new(client));
///
/// let settings = json!({"number_of_shards": 3}).as_object().cloned().unwrap_or_default();
/// let index = Index::new("products")?.with_settings(settings);
///
/// if !manager.exists(&index).await? {
///     manager.create(&index).await?;
/// }
/// manager.put_settings(&index, true).await?;
/// # Ok(())
/// # }
/// ```
pub struct IndexManager {
    client: Box<dyn IndicesClient>,
}

impl IndexManager {
    /// Create a new IndexManager.
    ///
    /// Mapping payloads are wrapped in the client's
    /// [`IndicesClient::document_type`].
    ///
    /// # Arguments
    ///
    /// * `client` - A boxed implementation of `IndicesClient` (e.g., `OpenSearchIndices`)
    pub fn new(client: Box<dyn IndicesClient>) -> Self {
        Self { client }
    }

    /// Payload addressing a single index: `{"index": <name>}`.
    fn base_payload(index: &Index) -> Payload {
        let mut payload = Payload::new();
        payload.set("index", index.name());
        payload
    }

    /// Wrap the object found at `path` in `response`, or an empty payload.
    fn extract(response: &Value, path: &[&str]) -> Payload {
        match value_at_path(response, path) {
            Some(Value::Object(map)) => Payload::from_map(map.clone()),
            _ => {
                warn!(path = ?path, "Response has no object at path, returning empty payload");
                Payload::new()
            }
        }
    }

    /// Check whether the index exists.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The client's answer, verbatim
    /// * `Err(IndexLifecycleError)` - If the client fails
    pub async fn exists(&self, index: &Index) -> Result<bool, IndexLifecycleError> {
        let payload = Self::base_payload(index);

        let exists = self.client.exists(&payload.to_value()).await?;

        debug!(index = %index.name(), exists, "Checked index existence");
        Ok(exists)
    }

    /// Create the index with whichever of its settings and mapping are non-empty.
    ///
    /// Sends `{index, body: {settings?, mappings?: {<type>: mapping}}}`. An
    /// index without settings or mapping is created bare, without a `body`.
    ///
    /// # Returns
    ///
    /// * `Ok(&Self)` - For chaining further operations
    /// * `Err(IndexLifecycleError)` - If the client fails
    pub async fn create(&self, index: &Index) -> Result<&Self, IndexLifecycleError> {
        let settings = index.settings();
        let mapping = index.mapping();

        let mut payload = Self::base_payload(index);

        if settings.count() > 0 {
            payload.scope("body").set("settings", settings).end()?;
        }

        if mapping.count() > 0 {
            payload
                .scope("body")
                .scope("mappings")
                .set(self.client.document_type(), mapping)
                .end()?
                .end()?;
        }

        self.client.create(&payload.to_value()).await?;

        info!(
            index = %index.name(),
            settings = settings.count(),
            mapping = mapping.count(),
            "Index created"
        );
        Ok(self)
    }

    /// Create the index unless it already exists.
    ///
    /// Intended for application startup.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index was created
    /// * `Ok(false)` - If the index already existed
    /// * `Err(IndexLifecycleError)` - If the client fails
    pub async fn ensure_exists(&self, index: &Index) -> Result<bool, IndexLifecycleError> {
        if self.exists(index).await? {
            debug!(index = %index.name(), "Index already exists");
            return Ok(false);
        }

        self.create(index).await?;
        Ok(true)
    }

    /// Delete the index.
    pub async fn delete(&self, index: &Index) -> Result<&Self, IndexLifecycleError> {
        let payload = Self::base_payload(index);

        self.client.delete(&payload.to_value()).await?;

        info!(index = %index.name(), "Index deleted");
        Ok(self)
    }

    /// Apply the index settings.
    ///
    /// With `force = false` a single settings request is sent. With
    /// `force = true` the index is closed, updated and reopened, in that
    /// order; each step runs only if the previous one succeeded.
    ///
    /// # Arguments
    ///
    /// * `index` - The index whose settings bundle is applied
    /// * `force` - Close the index around the update for settings that
    ///   require it
    ///
    /// # Returns
    ///
    /// * `Ok(&Self)` - For chaining further operations
    /// * `Err(IndexLifecycleError::PayloadEmpty)` - If the settings bundle is
    ///   empty; no backend call is made
    /// * `Err(IndexLifecycleError)` - The client error from whichever step
    ///   failed. After a failed update or reopen the index is left closed.
    pub async fn put_settings(
        &self,
        index: &Index,
        force: bool,
    ) -> Result<&Self, IndexLifecycleError> {
        let settings = index.settings();

        if settings.count() == 0 {
            return Err(IndexLifecycleError::payload_empty(
                index.name(),
                Bundle::Settings,
            ));
        }

        let base_payload = Self::base_payload(index);

        let mut settings_payload = base_payload.clone();
        settings_payload
            .scope("body")
            .set("settings", settings)
            .end()?;

        if force {
            self.close_update_open(
                index.name(),
                &base_payload.to_value(),
                &settings_payload.to_value(),
            )
            .await?;
        } else {
            self.client.put_settings(&settings_payload.to_value()).await?;
        }

        info!(index = %index.name(), force, "Index settings updated");
        Ok(self)
    }

    async fn close_update_open(
        &self,
        name: &str,
        base: &Value,
        settings: &Value,
    ) -> Result<(), IndexLifecycleError> {
        let failed = |phase: SettingsUpdatePhase| {
            move |e: &IndexLifecycleError| {
                if phase.leaves_index_closed() {
                    error!(index = %name, phase = %phase, error = %e, "Forced settings update failed, index left closed");
                } else {
                    error!(index = %name, phase = %phase, error = %e, "Forced settings update failed before closing index");
                }
            }
        };

        debug!(index = %name, phase = %SettingsUpdatePhase::Closing, "Forced settings update");
        self.client
            .close(base)
            .await
            .inspect_err(failed(SettingsUpdatePhase::Closing))?;
        debug!(index = %name, phase = %SettingsUpdatePhase::Closed, "Forced settings update");

        debug!(index = %name, phase = %SettingsUpdatePhase::Updating, "Forced settings update");
        self.client
            .put_settings(settings)
            .await
            .inspect_err(failed(SettingsUpdatePhase::Updating))?;
        debug!(index = %name, phase = %SettingsUpdatePhase::Updated, "Forced settings update");

        debug!(index = %name, phase = %SettingsUpdatePhase::Opening, "Forced settings update");
        self.client
            .open(base)
            .await
            .inspect_err(failed(SettingsUpdatePhase::Opening))?;
        debug!(index = %name, phase = %SettingsUpdatePhase::Open, "Forced settings update");

        Ok(())
    }

    /// Fetch the current index settings.
    ///
    /// Extracts `<name>.settings.index` from the response.
    ///
    /// # Returns
    ///
    /// * `Ok(Payload)` - The settings, or an empty payload if the response
    ///   does not contain them
    /// * `Err(IndexLifecycleError)` - If the client fails
    pub async fn get_settings(&self, index: &Index) -> Result<Payload, IndexLifecycleError> {
        let payload = Self::base_payload(index);

        let response = self.client.get_settings(&payload.to_value()).await?;

        Ok(Self::extract(&response, &[index.name(), "settings", "index"]))
    }

    /// Apply the index mapping.
    ///
    /// Sends `{index, type: <type>, body: {<type>: mapping}}`.
    ///
    /// # Returns
    ///
    /// * `Ok(&Self)` - For chaining further operations
    /// * `Err(IndexLifecycleError::PayloadEmpty)` - If the mapping bundle is
    ///   empty; no backend call is made
    /// * `Err(IndexLifecycleError)` - If the client fails
    pub async fn put_mapping(&self, index: &Index) -> Result<&Self, IndexLifecycleError> {
        let mapping = index.mapping();

        if mapping.count() == 0 {
            return Err(IndexLifecycleError::payload_empty(
                index.name(),
                Bundle::Mapping,
            ));
        }

        let document_type = self.client.document_type();

        let mut payload = Self::base_payload(index);
        payload
            .set("type", document_type)
            .scope("body")
            .set(document_type, mapping)
            .end()?;

        self.client.put_mapping(&payload.to_value()).await?;

        info!(index = %index.name(), fields = mapping.count(), "Index mapping updated");
        Ok(self)
    }

    /// Fetch the current index mapping.
    ///
    /// Extracts `<name>.mappings.<type>` from the response.
    ///
    /// # Returns
    ///
    /// * `Ok(Payload)` - The mapping, or an empty payload if the response
    ///   does not contain it
    /// * `Err(IndexLifecycleError)` - If the client fails
    pub async fn get_mapping(&self, index: &Index) -> Result<Payload, IndexLifecycleError> {
        let payload = Self::base_payload(index);

        let response = self.client.get_mapping(&payload.to_value()).await?;

        Ok(Self::extract(
            &response,
            &[index.name(), "mappings", self.client.document_type()],
        ))
    }
}
