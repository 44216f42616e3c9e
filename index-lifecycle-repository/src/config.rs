//! Configuration constants for index payloads.

/// Document type used for typed mapping requests and responses.
pub const DEFAULT_DOCUMENT_TYPE: &str = "_doc";
