//! Dependency initialization and wiring for the index lifecycle binary.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::LifecycleConfig;
use crate::errors::LifecycleError;
use index_lifecycle_repository::{
    Index, IndexLifecycleError, IndexManager, IndicesClient, OpenSearchIndices,
};
use serde_json::json;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from an optional setting.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Manager bound to the OpenSearch indices client.
    pub manager: IndexManager,
    /// The index the configured action targets.
    pub index: Index,
}

impl Dependencies {
    /// Initialize all dependencies from the configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(LifecycleError)` - If the definition cannot be loaded, or
    ///   OpenSearch is unreachable in fail-fast mode
    pub async fn new(config: &LifecycleConfig) -> Result<Self, LifecycleError> {
        info!(
            opensearch_url = %config.opensearch_url,
            action = %config.action,
            force = config.force,
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let index = config.load_index()?;

        let client = Self::connect_to_opensearch(
            &config.opensearch_url,
            index.name(),
            config.connection_mode,
            config.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        Ok(Self {
            manager: IndexManager::new(Box::new(client)),
            index,
        })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    ///
    /// Only transient failures are retried: transport errors and 5xx
    /// responses to the probe. An invalid URL or a rejected request (e.g.
    /// 401/403) fails immediately in either mode.
    async fn connect_to_opensearch(
        url: &str,
        index_name: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchIndices, LifecycleError> {
        let client = OpenSearchIndices::new(url)?;
        let probe = json!({ "index": index_name });

        loop {
            match client.exists(&probe).await {
                Ok(_) => return Ok(client),
                Err(e) if mode == ConnectionMode::Retry && Self::is_transient(&e) => {
                    warn!(
                        opensearch_url = %url,
                        error = %e,
                        retry_interval_secs = retry_interval.as_secs(),
                        "Failed to connect to OpenSearch, retrying..."
                    );
                    sleep(retry_interval).await;
                }
                Err(e) => {
                    return Err(LifecycleError::config(format!(
                        "Failed to connect to OpenSearch: {}",
                        e
                    )));
                }
            }
        }
    }

    /// Whether a failed probe is worth retrying.
    fn is_transient(error: &IndexLifecycleError) -> bool {
        match error {
            IndexLifecycleError::ConnectionError(_) => true,
            IndexLifecycleError::BackendError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
