//! Embedding generation for domain indexes.
//!
//! The same provider (and therefore the same model and dimension) must
//! be used for index build and query-time search.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
