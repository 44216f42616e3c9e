//! Environment configuration for the index lifecycle binary.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use index_lifecycle_repository::Index;
use serde_json::Value;
use tracing::{info, warn};

use crate::action::Action;
use crate::config::ConnectionMode;
use crate::errors::LifecycleError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Settings read from the environment.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// OpenSearch server URL.
    pub opensearch_url: String,
    /// JSON index definition (`{"name", "settings", "mappings"}`).
    pub definition_path: Option<PathBuf>,
    /// Index name; overrides the definition's name when both are given.
    pub index_name: Option<String>,
    /// Action to run.
    pub action: Action,
    /// Close the index around settings updates.
    pub force: bool,
    /// Behaviour when OpenSearch is unreachable at startup.
    pub connection_mode: ConnectionMode,
    /// Delay between connection attempts in retry mode.
    pub retry_interval: Duration,
}

impl LifecycleConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_DEFINITION_PATH`: Path to a JSON index definition
    /// - `INDEX_NAME`: Index name, required when no definition is given
    /// - `INDEX_ACTION`: Action to run (default: ensure)
    /// - `INDEX_FORCE_SETTINGS`: "true" or "1" to close the index around settings updates
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    pub fn from_env() -> Result<Self, LifecycleError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, LifecycleError> {
        let opensearch_url =
            var("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());
        let definition_path = var("INDEX_DEFINITION_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let index_name = var("INDEX_NAME").filter(|name| !name.trim().is_empty());
        let action = match var("INDEX_ACTION") {
            Some(action) => action.parse()?,
            None => Action::Ensure,
        };
        let force = var("INDEX_FORCE_SETTINGS")
            .map(|value| matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);
        let connection_mode = ConnectionMode::parse(var("OPENSEARCH_CONNECTION_MODE").as_deref());
        let retry_interval = var("OPENSEARCH_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        if definition_path.is_none() && index_name.is_none() {
            return Err(LifecycleError::config(
                "either INDEX_DEFINITION_PATH or INDEX_NAME must be set",
            ));
        }
        if definition_path.is_none() && action.requires_definition() {
            return Err(LifecycleError::config(format!(
                "action '{}' requires INDEX_DEFINITION_PATH",
                action
            )));
        }

        Ok(Self {
            opensearch_url,
            definition_path,
            index_name,
            action,
            force,
            connection_mode,
            retry_interval: Duration::from_secs(retry_interval),
        })
    }

    /// Build the target index from the definition file and/or `INDEX_NAME`.
    pub fn load_index(&self) -> Result<Index, LifecycleError> {
        let Some(path) = &self.definition_path else {
            let name = self.index_name.clone().unwrap_or_default();
            return Ok(Index::new(name)?);
        };

        let contents = fs::read_to_string(path).map_err(|e| {
            LifecycleError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let definition: Value = serde_json::from_str(&contents).map_err(|e| {
            LifecycleError::config(format!("invalid JSON in {}: {}", path.display(), e))
        })?;
        let index = Index::from_definition(&definition)?;

        let index = match &self.index_name {
            Some(name) if name != index.name() => {
                warn!(
                    definition_name = %index.name(),
                    index_name = %name,
                    "INDEX_NAME overrides the definition name"
                );
                Index::new(name.as_str())?
                    .with_settings(index.settings().clone())
                    .with_mapping(index.mapping().clone())
            }
            _ => index,
        };

        info!(
            index = %index.name(),
            path = %path.display(),
            settings = index.settings().count(),
            mapping = index.mapping().count(),
            "Loaded index definition"
        );
        Ok(index)
    }
}
