//! OpenSearch indices client implementation.
//!
//! This module provides the concrete implementation of `IndicesClient`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{
        IndicesCloseParts, IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts,
        IndicesGetMappingParts, IndicesGetSettingsParts, IndicesOpenParts,
        IndicesPutMappingParts, IndicesPutSettingsParts,
    },
    OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::config::DEFAULT_DOCUMENT_TYPE;
use crate::errors::IndexLifecycleError;
use crate::interfaces::IndicesClient;
use crate::opensearch::doc_type;

/// OpenSearch indices client.
///
/// Executes index-level requests (`/_settings`, `/_mapping`, `/_open`,
/// `/_close`, ...) against a single OpenSearch node. Typed mapping payloads
/// are converted to the typeless form OpenSearch 2.x expects.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchIndices::new("http://localhost:9200")?;
/// let exists = client.exists(&json!({"index": "products"})).await?;
/// ```
pub struct OpenSearchIndices {
    client: OpenSearch,
    document_type: String,
}

impl OpenSearchIndices {
    /// Create a new client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchIndices)` - A new client instance
    /// * `Err(IndexLifecycleError::ValidationError)` - If the URL is invalid
    /// * `Err(IndexLifecycleError::ConnectionError)` - If transport setup fails
    pub fn new(url: &str) -> Result<Self, IndexLifecycleError> {
        let parsed_url = Url::parse(url).map_err(|e| {
            IndexLifecycleError::validation(format!("invalid OpenSearch URL '{}': {}", url, e))
        })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch indices client");

        Ok(Self::from_client(OpenSearch::new(transport)))
    }

    /// Wrap an already configured OpenSearch client.
    pub fn from_client(client: OpenSearch) -> Self {
        Self {
            client,
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
        }
    }

    /// Use a document type other than `_doc` for typed mappings.
    ///
    /// `IndexManager` reads it back through [`IndicesClient::document_type`].
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    /// Read the target index name from a payload.
    fn index_name(payload: &Value) -> Result<&str, IndexLifecycleError> {
        payload
            .get("index")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| IndexLifecycleError::validation("payload has no index name"))
    }

    /// Read the request body from a payload, defaulting to an empty object.
    fn body(payload: &Value) -> Value {
        payload.get("body").cloned().unwrap_or_else(|| json!({}))
    }

    /// Turn a non-2xx response into a backend error.
    async fn ensure_success(
        operation: &str,
        index: &str,
        response: Response,
    ) -> Result<Response, IndexLifecycleError> {
        let status = response.status_code();
        if status.is_success() {
            debug!(operation, index = %index, status = %status, "Indices request succeeded");
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(
            operation,
            index = %index,
            status = %status,
            body = %error_body,
            "Indices request failed"
        );
        Err(IndexLifecycleError::backend(
            operation,
            status.as_u16(),
            error_body,
        ))
    }

    async fn read_json(operation: &str, response: Response) -> Result<Value, IndexLifecycleError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| IndexLifecycleError::parse(format!("{} response: {}", operation, e)))
    }
}

#[async_trait]
impl IndicesClient for OpenSearchIndices {
    fn document_type(&self) -> &str {
        &self.document_type
    }

    /// HEAD `/<index>`: 200 means the index exists, 404 that it does not.
    async fn exists(&self, payload: &Value) -> Result<bool, IndexLifecycleError> {
        let index = Self::index_name(payload)?;

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Self::ensure_success("exists", index, response)
                .await
                .map(|_| true),
        }
    }

    async fn create(&self, payload: &Value) -> Result<(), IndexLifecycleError> {
        let index = Self::index_name(payload)?;
        let body = doc_type::untyped_create_body(&Self::body(payload), &self.document_type);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        Self::ensure_success("create", index, response).await?;
        Ok(())
    }

    async fn delete(&self, payload: &Value) -> Result<(), IndexLifecycleError> {
        let index = Self::index_name(payload)?;

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        Self::ensure_success("delete", index, response).await?;
        Ok(())
    }

    async fn put_settings(&self, payload: &Value) -> Result<(), IndexLifecycleError> {
        let index = Self::index_name(payload)?;

        let response = self
            .client
            .indices()
            .put_settings(IndicesPutSettingsParts::Index(&[index]))
            .body(Self::body(payload))
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        Self::ensure_success("put_settings", index, response).await?;
        Ok(())
    }

    async fn get_settings(&self, payload: &Value) -> Result<Value, IndexLifecycleError> {
        let index = Self::index_name(payload)?;

        let response = self
            .client
            .indices()
            .get_settings(IndicesGetSettingsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        let response = Self::ensure_success("get_settings", index, response).await?;
        Self::read_json("get_settings", response).await
    }

    async fn put_mapping(&self, payload: &Value) -> Result<(), IndexLifecycleError> {
        let index = Self::index_name(payload)?;
        let document_type = payload
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(&self.document_type);
        let body = doc_type::untyped_mapping_body(&Self::body(payload), document_type);

        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        Self::ensure_success("put_mapping", index, response).await?;
        Ok(())
    }

    async fn get_mapping(&self, payload: &Value) -> Result<Value, IndexLifecycleError> {
        let index = Self::index_name(payload)?;

        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        let response = Self::ensure_success("get_mapping", index, response).await?;
        let mapping = Self::read_json("get_mapping", response).await?;
        Ok(doc_type::typed_mapping_response(mapping, &self.document_type))
    }

    async fn close(&self, payload: &Value) -> Result<(), IndexLifecycleError> {
        let index = Self::index_name(payload)?;

        let response = self
            .client
            .indices()
            .close(IndicesCloseParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        Self::ensure_success("close", index, response).await?;
        Ok(())
    }

    async fn open(&self, payload: &Value) -> Result<(), IndexLifecycleError> {
        let index = Self::index_name(payload)?;

        let response = self
            .client
            .indices()
            .open(IndicesOpenParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexLifecycleError::connection(e.to_string()))?;

        Self::ensure_success("open", index, response).await?;
        Ok(())
    }
}
