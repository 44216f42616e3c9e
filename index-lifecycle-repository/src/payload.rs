//! Schema-less request payload builder.
//!
//! Request bodies for the indices API differ per operation, so instead of one
//! struct per request this module offers a nested key-value builder. Scopes
//! are stored in an arena and refer to their parent by index, which lets the
//! builder walk back up the tree with [`Payload::end`] while keeping `Clone`
//! a plain deep copy.
//!
//! # Example
//!
//! ```
//! use index_lifecycle_repository::Payload;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), index_lifecycle_repository::IndexLifecycleError> {
//! let mut payload = Payload::new();
//! payload
//!     .set("index", "products")
//!     .scope("body")
//!     .scope("settings")
//!     .set("number_of_replicas", 2)
//!     .end()?
//!     .end()?;
//!
//! assert_eq!(
//!     payload.to_value(),
//!     json!({"index": "products", "body": {"settings": {"number_of_replicas": 2}}})
//! );
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::IndexLifecycleError;

/// Index of the root scope in the arena.
const ROOT: usize = 0;

#[derive(Debug, Clone)]
enum Slot {
    Value(Value),
    Scope(usize),
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<usize>,
    fields: BTreeMap<String, Slot>,
}

/// A nested request body under construction.
///
/// A `Payload` always has a current scope (the cursor). [`set`](Self::set)
/// writes into it, [`scope`](Self::scope) descends into a named child scope
/// and [`end`](Self::end) climbs back to the parent. Serialization methods
/// operate on the current scope.
#[derive(Debug, Clone)]
pub struct Payload {
    nodes: Vec<Node>,
    cursor: usize,
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            nodes: vec![Node::default()],
            cursor: ROOT,
        }
    }
}

impl Payload {
    /// Create an empty root payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root payload pre-populated from a plain nested mapping.
    ///
    /// Nested objects become scopes, so they can be re-entered with
    /// [`scope`](Self::scope) afterwards.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut payload = Self::default();
        payload.populate(ROOT, map);
        payload
    }

    /// Store `value` under `name` in the current scope.
    ///
    /// Replaces whatever was stored under `name`. Returns the same scope so
    /// calls can be chained.
    ///
    /// A replaced scope stays in the arena, unreachable, and is copied by
    /// `clone()`. Use [`detach`](Self::detach) for a compact copy.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let slot = match value.into() {
            Value::Object(map) => {
                let child = self.push_node(self.cursor);
                self.populate(child, map);
                Slot::Scope(child)
            }
            other => Slot::Value(other),
        };
        self.nodes[self.cursor].fields.insert(name.into(), slot);
        self
    }

    /// Enter the child scope stored under `name`, creating it if needed.
    ///
    /// A scalar previously stored under `name` is replaced by an empty scope.
    pub fn scope(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let existing = match self.nodes[self.cursor].fields.get(&name) {
            Some(Slot::Scope(child)) => Some(*child),
            _ => None,
        };

        let child = match existing {
            Some(child) => child,
            None => {
                let child = self.push_node(self.cursor);
                self.nodes[self.cursor]
                    .fields
                    .insert(name, Slot::Scope(child));
                child
            }
        };

        self.cursor = child;
        self
    }

    /// Return to the parent scope.
    ///
    /// # Errors
    ///
    /// * `IndexLifecycleError::InvalidScope` - If the current scope is the root
    pub fn end(&mut self) -> Result<&mut Self, IndexLifecycleError> {
        match self.nodes[self.cursor].parent {
            Some(parent) => {
                self.cursor = parent;
                Ok(self)
            }
            None => Err(IndexLifecycleError::InvalidScope),
        }
    }

    /// Return to the root scope regardless of depth.
    pub fn root(&mut self) -> &mut Self {
        self.cursor = ROOT;
        self
    }

    /// Whether the current scope is the root scope.
    pub fn is_root(&self) -> bool {
        self.nodes[self.cursor].parent.is_none()
    }

    /// Number of keys set directly in the current scope (not recursive).
    pub fn count(&self) -> usize {
        self.nodes[self.cursor].fields.len()
    }

    /// Whether the current scope has no keys.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Serialized value stored under `name` in the current scope.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.nodes[self.cursor]
            .fields
            .get(name)
            .map(|slot| self.slot_value(slot))
    }

    /// Copy the current scope and everything below it into a new root payload.
    ///
    /// Only reachable scopes are copied.
    pub fn detach(&self) -> Self {
        Self::from_map(self.to_map())
    }

    /// Convert the current scope into a plain nested mapping.
    pub fn to_map(&self) -> Map<String, Value> {
        self.map_of(self.cursor)
    }

    /// Convert the current scope into a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    fn push_node(&mut self, parent: usize) -> usize {
        self.nodes.push(Node {
            parent: Some(parent),
            fields: BTreeMap::new(),
        });
        self.nodes.len() - 1
    }

    fn populate(&mut self, node: usize, map: Map<String, Value>) {
        for (key, value) in map {
            let slot = match value {
                Value::Object(inner) => {
                    let child = self.push_node(node);
                    self.populate(child, inner);
                    Slot::Scope(child)
                }
                other => Slot::Value(other),
            };
            self.nodes[node].fields.insert(key, slot);
        }
    }

    fn map_of(&self, node: usize) -> Map<String, Value> {
        self.nodes[node]
            .fields
            .iter()
            .map(|(key, slot)| (key.clone(), self.slot_value(slot)))
            .collect()
    }

    fn slot_value(&self, slot: &Slot) -> Value {
        match slot {
            Slot::Value(value) => value.clone(),
            Slot::Scope(child) => Value::Object(self.map_of(*child)),
        }
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

impl From<&Payload> for Value {
    fn from(payload: &Payload) -> Self {
        payload.to_value()
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        payload.to_value()
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_set_chains_in_current_scope() {
        let mut payload = Payload::new();
        payload.set("index", "products").set("type", "_doc");

        assert_eq!(payload.to_value(), json!({"index": "products", "type": "_doc"}));
        assert_eq!(payload.count(), 2);
    }

    #[test]
    fn test_scope_and_end_navigation() {
        let mut payload = Payload::new();
        payload
            .set("index", "products")
            .scope("body")
            .scope("mappings")
            .set("dynamic", false)
            .end()
            .unwrap()
            .set("aliases", json!([]))
            .end()
            .unwrap();

        assert!(payload.is_root());
        assert_eq!(
            payload.to_value(),
            json!({
                "index": "products",
                "body": {"mappings": {"dynamic": false}, "aliases": []}
            })
        );
    }

    #[test]
    fn test_end_on_root_fails() {
        let mut payload = Payload::new();
        let result = payload.end();
        assert!(matches!(result, Err(IndexLifecycleError::InvalidScope)));
    }

    #[test]
    fn test_end_more_than_entered_fails() {
        let mut payload = Payload::new();
        payload.scope("body");
        assert!(payload.end().is_ok());
        assert!(matches!(payload.end(), Err(IndexLifecycleError::InvalidScope)));
    }

    #[test]
    fn test_scope_reenters_existing_child() {
        let mut payload = Payload::new();
        payload.scope("body").set("a", 1).end().unwrap();
        payload.scope("body").set("b", 2).end().unwrap();

        assert_eq!(payload.to_value(), json!({"body": {"a": 1, "b": 2}}));
    }

    #[test]
    fn test_scope_reenters_object_set_as_value() {
        let mut payload = Payload::new();
        payload.set("body", json!({"settings": {"number_of_shards": 1}}));
        payload
            .scope("body")
            .scope("settings")
            .set("number_of_replicas", 0);

        payload.root();
        assert_eq!(
            payload.to_value(),
            json!({"body": {"settings": {"number_of_shards": 1, "number_of_replicas": 0}}})
        );
    }

    #[test]
    fn test_scope_replaces_scalar() {
        let mut payload = Payload::new();
        payload.set("body", "placeholder");
        payload.scope("body").set("a", 1);

        payload.root();
        assert_eq!(payload.to_value(), json!({"body": {"a": 1}}));
    }

    #[test]
    fn test_count_is_not_recursive() {
        let mut payload = Payload::new();
        payload
            .set("a", 1)
            .scope("nested")
            .set("b", 2)
            .set("c", 3)
            .end()
            .unwrap();

        assert_eq!(payload.count(), 2);
        assert!(!payload.is_empty());
        assert!(Payload::new().is_empty());
    }

    #[test]
    fn test_serialization_reflects_current_scope() {
        let mut payload = Payload::new();
        payload.set("index", "products").scope("body").set("a", 1);

        assert_eq!(payload.to_value(), json!({"a": 1}));
        payload.root();
        assert_eq!(payload.to_value(), json!({"index": "products", "body": {"a": 1}}));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Payload::new();
        original
            .set("index", "products")
            .scope("body")
            .scope("settings")
            .set("number_of_shards", 3)
            .end()
            .unwrap()
            .end()
            .unwrap();
        let before = original.to_value();

        let mut copy = original.clone();
        copy.set("type", "_doc")
            .scope("body")
            .scope("settings")
            .set("number_of_shards", 5)
            .set("refresh_interval", "1s");

        assert_eq!(original.to_value(), before);
        copy.root();
        assert_ne!(copy.to_value(), original.to_value());
        assert_eq!(copy.get("type"), Some(json!("_doc")));
        assert_eq!(original.get("type"), None);
    }

    #[test]
    fn test_clone_preserves_cursor() {
        let mut original = Payload::new();
        original.scope("body");

        let mut copy = original.clone();
        assert!(!copy.is_root());
        copy.set("a", 1).end().unwrap();
        assert_eq!(copy.to_value(), json!({"body": {"a": 1}}));
        assert_eq!(original.to_value(), json!({}));
    }

    #[test]
    fn test_detach_is_parentless() {
        let mut payload = Payload::new();
        payload.set("index", "products").scope("body").set("a", 1);

        let mut detached = payload.detach();
        assert!(detached.is_root());
        assert!(matches!(detached.end(), Err(IndexLifecycleError::InvalidScope)));
        assert_eq!(detached.to_value(), json!({"a": 1}));
    }

    #[test]
    fn test_from_map_round_trip() {
        let map = as_map(json!({
            "number_of_shards": "3",
            "analysis": {
                "analyzer": {
                    "folding": {"tokenizer": "standard", "filter": ["lowercase", "asciifolding"]}
                },
                "normalizer": {}
            },
            "blocks": {"read_only": null}
        }));

        let payload = Payload::from_map(map.clone());
        assert_eq!(payload.to_map(), map);
        assert_eq!(payload.count(), 3);
    }

    #[test]
    fn test_set_payload_as_value() {
        let settings = Payload::from_map(as_map(json!({"number_of_shards": 3})));

        let mut payload = Payload::new();
        payload.scope("body").set("settings", &settings).end().unwrap();

        assert_eq!(
            payload.to_value(),
            json!({"body": {"settings": {"number_of_shards": 3}}})
        );
    }

    #[test]
    fn test_serde_serialize() {
        let mut payload = Payload::new();
        payload.set("index", "products").scope("body").set("a", 1);
        payload.root();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"index": "products", "body": {"a": 1}}));
    }

    #[test]
    fn test_replaced_scope_is_unreachable_and_dropped_by_detach() {
        let mut payload = Payload::new();
        payload
            .scope("settings")
            .set("number_of_shards", 3)
            .set("refresh_interval", "1s")
            .end()
            .unwrap();

        payload.set("settings", json!({"number_of_replicas": 1}));

        assert_eq!(
            payload.to_value(),
            json!({"settings": {"number_of_replicas": 1}})
        );
        assert_eq!(payload.nodes.len(), 3);
        assert_eq!(payload.detach().nodes.len(), 2);
    }
}
