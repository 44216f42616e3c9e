//! Lifecycle actions runnable from the binary.

use std::fmt;
use std::str::FromStr;

use index_lifecycle_repository::{Index, IndexLifecycleError, IndexManager};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::LifecycleError;

/// A single lifecycle action, selected with `INDEX_ACTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create the index if missing, otherwise apply its settings and mapping.
    ///
    /// Settings go first so analyzers they define exist before the mapping
    /// references them. Static settings such as `analysis` are only accepted
    /// on a closed index and need `INDEX_FORCE_SETTINGS`.
    Ensure,
    /// Create the index.
    Create,
    /// Delete the index.
    Delete,
    /// Report whether the index exists.
    Exists,
    /// Apply the settings bundle.
    PutSettings,
    /// Apply the mapping bundle.
    PutMapping,
    /// Print the current settings.
    GetSettings,
    /// Print the current mapping.
    GetMapping,
}

impl Action {
    /// Whether the action needs the settings or mapping from a definition file.
    pub fn requires_definition(&self) -> bool {
        matches!(
            self,
            Self::Ensure | Self::Create | Self::PutSettings | Self::PutMapping
        )
    }
}

impl FromStr for Action {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "ensure" => Ok(Self::Ensure),
            "create" => Ok(Self::Create),
            "delete" => Ok(Self::Delete),
            "exists" => Ok(Self::Exists),
            "put-settings" => Ok(Self::PutSettings),
            "put-mapping" => Ok(Self::PutMapping),
            "get-settings" => Ok(Self::GetSettings),
            "get-mapping" => Ok(Self::GetMapping),
            other => Err(LifecycleError::config(format!(
                "unknown INDEX_ACTION '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            Self::Ensure => "ensure",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Exists => "exists",
            Self::PutSettings => "put-settings",
            Self::PutMapping => "put-mapping",
            Self::GetSettings => "get-settings",
            Self::GetMapping => "get-mapping",
        };
        f.write_str(action)
    }
}

/// Result of a completed action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The action changed the index and has nothing to report.
    Done,
    /// `ensure` finished; `created` tells whether the index was new.
    Ensured { created: bool },
    /// Answer of an existence check.
    Exists(bool),
    /// Settings or mapping fetched from the backend.
    Payload(Value),
}

/// Run `action` against `index`.
///
/// `force` applies to settings updates only and closes the index around the
/// update.
pub async fn run_action(
    manager: &IndexManager,
    index: &Index,
    action: Action,
    force: bool,
) -> Result<ActionOutcome, IndexLifecycleError> {
    info!(index = %index.name(), action = %action, force, "Running index action");

    let outcome = match action {
        Action::Ensure => {
            let created = manager.ensure_exists(index).await?;
            if !created {
                if !index.settings().is_empty() {
                    if !force {
                        warn!(
                            index = %index.name(),
                            "Updating settings on an open index; static settings need INDEX_FORCE_SETTINGS"
                        );
                    }
                    manager.put_settings(index, force).await?;
                }
                if !index.mapping().is_empty() {
                    manager.put_mapping(index).await?;
                }
            }
            ActionOutcome::Ensured { created }
        }
        Action::Create => {
            manager.create(index).await?;
            ActionOutcome::Done
        }
        Action::Delete => {
            manager.delete(index).await?;
            ActionOutcome::Done
        }
        Action::Exists => ActionOutcome::Exists(manager.exists(index).await?),
        Action::PutSettings => {
            manager.put_settings(index, force).await?;
            ActionOutcome::Done
        }
        Action::PutMapping => {
            manager.put_mapping(index).await?;
            ActionOutcome::Done
        }
        Action::GetSettings => ActionOutcome::Payload(manager.get_settings(index).await?.to_value()),
        Action::GetMapping => ActionOutcome::Payload(manager.get_mapping(index).await?.to_value()),
    };

    Ok(outcome)
}
