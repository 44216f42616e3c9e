//! Utility functions for the index lifecycle repository.

use serde_json::Value;

/// Walk a nested JSON value by an ordered sequence of object keys.
///
/// Segments are matched as whole keys, so index names containing dots are
/// looked up correctly. Returns `None` as soon as a segment is missing or the
/// value at that point is not an object.
///
/// # Example
///
/// ```
/// use index_lifecycle_repository::value_at_path;
/// use serde_json::json;
///
/// let response = json!({"logs.2024": {"settings": {"index": {"number_of_shards": "1"}}}});
///
/// let settings = value_at_path(&response, &["logs.2024", "settings", "index"]);
/// assert_eq!(settings, Some(&json!({"number_of_shards": "1"})));
/// assert_eq!(value_at_path(&response, &["logs", "settings"]), None);
/// ```
pub fn value_at_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, segment| current.as_object()?.get(*segment))
}
