//! Mapping type compatibility.
//!
//! Request payloads carry mappings wrapped in a document type
//! (`mappings._doc`, `body._doc`), while OpenSearch 2.x only accepts and
//! returns typeless mappings. These helpers convert between the two shapes.

use serde_json::{Map, Value};

/// Unwrap `mappings.<type>` in an index creation body.
pub(crate) fn untyped_create_body(body: &Value, document_type: &str) -> Value {
    let mut body = body.clone();
    if let Some(mappings) = body.get_mut("mappings") {
        if let Some(inner) = mappings.get(document_type).cloned() {
            *mappings = inner;
        }
    }
    body
}

/// Unwrap `<type>` in a put mapping body, if present.
pub(crate) fn untyped_mapping_body(body: &Value, document_type: &str) -> Value {
    body.get(document_type).cloned().unwrap_or_else(|| body.clone())
}

/// Wrap each index's non-empty mappings under `<type>` unless already typed.
pub(crate) fn typed_mapping_response(mut response: Value, document_type: &str) -> Value {
    if let Some(indices) = response.as_object_mut() {
        for entry in indices.values_mut() {
            let Some(mappings) = entry.get_mut("mappings") else {
                continue;
            };
            let untyped = matches!(
                mappings.as_object(),
                Some(map) if !map.is_empty() && !map.contains_key(document_type)
            );
            if untyped {
                let mut wrapper = Map::new();
                wrapper.insert(document_type.to_string(), mappings.take());
                *mappings = Value::Object(wrapper);
            }
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untyped_create_body() {
        let body = json!({
            "settings": {"number_of_shards": 1},
            "mappings": {"_doc": {"properties": {"title": {"type": "text"}}}}
        });

        assert_eq!(
            untyped_create_body(&body, "_doc"),
            json!({
                "settings": {"number_of_shards": 1},
                "mappings": {"properties": {"title": {"type": "text"}}}
            })
        );
    }

    #[test]
    fn test_untyped_create_body_without_mappings() {
        let body = json!({"settings": {"number_of_shards": 1}});
        assert_eq!(untyped_create_body(&body, "_doc"), body);
    }

    #[test]
    fn test_untyped_mapping_body() {
        let body = json!({"_doc": {"properties": {}}});
        assert_eq!(untyped_mapping_body(&body, "_doc"), json!({"properties": {}}));

        let body = json!({"properties": {}});
        assert_eq!(untyped_mapping_body(&body, "_doc"), body);
    }

    #[test]
    fn test_typed_mapping_response() {
        let response = json!({
            "products": {"mappings": {"properties": {"title": {"type": "text"}}}},
            "empty": {"mappings": {}},
            "typed": {"mappings": {"_doc": {"dynamic": false}}}
        });

        assert_eq!(
            typed_mapping_response(response, "_doc"),
            json!({
                "products": {"mappings": {"_doc": {"properties": {"title": {"type": "text"}}}}},
                "empty": {"mappings": {}},
                "typed": {"mappings": {"_doc": {"dynamic": false}}}
            })
        );
    }
}
