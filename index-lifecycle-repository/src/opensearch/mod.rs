//! OpenSearch implementation of the indices client.
//!
//! This module provides a concrete implementation of `IndicesClient`
//! using OpenSearch as the backend.

pub(crate) mod doc_type;
mod indices;

pub use indices::OpenSearchIndices;
