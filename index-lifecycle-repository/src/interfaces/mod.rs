//! Interface definitions for the indices client.
//!
//! This module defines the abstract `IndicesClient` trait that allows for
//! dependency injection and swappable search backend implementations.

mod indices_client;

pub use indices_client::IndicesClient;
