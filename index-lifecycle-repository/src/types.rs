//! Domain types for index lifecycle operations.

use std::fmt;

use serde_json::Value;

use crate::errors::IndexLifecycleError;
use crate::payload::Payload;

/// A search index definition: its name plus settings and mapping bundles.
///
/// Both bundles may be empty. `IndexManager` only reads an `Index`; the
/// caller owns it.
#[derive(Debug, Clone)]
pub struct Index {
    name: String,
    settings: Payload,
    mapping: Payload,
}

impl Index {
    /// Create an index definition with empty settings and mapping.
    ///
    /// # Errors
    ///
    /// * `IndexLifecycleError::ValidationError` - If `name` is empty or blank
    pub fn new(name: impl Into<String>) -> Result<Self, IndexLifecycleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IndexLifecycleError::validation("index name is required"));
        }

        Ok(Self {
            name,
            settings: Payload::new(),
            mapping: Payload::new(),
        })
    }

    /// Replace the settings bundle.
    pub fn with_settings(mut self, settings: impl Into<Payload>) -> Self {
        self.settings = settings.into();
        self
    }

    /// Replace the mapping bundle.
    pub fn with_mapping(mut self, mapping: impl Into<Payload>) -> Self {
        self.mapping = mapping.into();
        self
    }

    /// Build an index from a JSON definition.
    ///
    /// The definition has the shape
    /// `{"name": "...", "settings": {...}, "mappings": {...}}`; both bundles
    /// are optional.
    ///
    /// # Errors
    ///
    /// * `IndexLifecycleError::ValidationError` - If the name is missing or a
    ///   bundle is not a JSON object
    pub fn from_definition(definition: &Value) -> Result<Self, IndexLifecycleError> {
        let name = definition
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| IndexLifecycleError::validation("definition requires a string name"))?;

        let mut index = Self::new(name)?;
        if let Some(settings) = Self::bundle(definition, "settings")? {
            index.settings = settings;
        }
        if let Some(mapping) = Self::bundle(definition, "mappings")? {
            index.mapping = mapping;
        }
        Ok(index)
    }

    fn bundle(definition: &Value, key: &str) -> Result<Option<Payload>, IndexLifecycleError> {
        match definition.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Payload::from_map(map.clone()))),
            Some(_) => Err(IndexLifecycleError::validation(format!(
                "definition {} must be an object",
                key
            ))),
        }
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The settings bundle.
    pub fn settings(&self) -> &Payload {
        &self.settings
    }

    /// The mapping bundle.
    pub fn mapping(&self) -> &Payload {
        &self.mapping
    }
}

/// Progress of a forced settings update (close, update, reopen).
///
/// Used to report how far the sequence got when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsUpdatePhase {
    /// Close request issued.
    Closing,
    /// Index closed, settings not yet sent.
    Closed,
    /// Settings request issued while closed.
    Updating,
    /// Settings applied, index still closed.
    Updated,
    /// Open request issued.
    Opening,
    /// Index open again with the new settings.
    Open,
}

impl SettingsUpdatePhase {
    /// Whether the index is known to be closed when the sequence stops here.
    pub fn leaves_index_closed(&self) -> bool {
        matches!(
            self,
            Self::Closed | Self::Updating | Self::Updated | Self::Opening
        )
    }
}

impl fmt::Display for SettingsUpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Updating => "updating",
            Self::Updated => "updated",
            Self::Opening => "opening",
            Self::Open => "open",
        };
        f.write_str(phase)
    }
}
