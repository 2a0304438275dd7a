//! Retrieval crate for the concierge pipeline.
//!
//! Turns raw per-domain text into searchable chunks:
//! - `chunker`: overlapping character-window splitting
//! - `embeddings`: provider-agnostic embedding generation
//! - `index`: per-domain in-memory nearest-neighbor search

pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod types;

// Re-export main types
pub use chunker::{Chunker, Chunks};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::DomainIndex;
pub use types::{Chunk, DocumentInput, RetrievedChunk};
