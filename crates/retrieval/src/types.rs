//! Retrieval type definitions.

use serde::{Deserialize, Serialize};

/// A bounded-length passage of source text, owned by exactly one domain.
///
/// Immutable once created. Consecutive chunks from the same source share
/// `overlap` characters of text so that context spanning a chunk boundary
/// is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content, at most `chunk_size` characters
    pub text: String,

    /// Identifier of the source document this chunk came from
    pub source_id: String,

    /// Name of the domain that owns this chunk
    pub domain: String,

    /// Position of this chunk within its source
    pub sequence_index: u32,
}

/// One source document handed to the pipeline by an external loader.
///
/// The core never fetches or parses raw web content itself; it receives
/// clean `(text, source_id)` pairs at the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub text: String,
    pub source_id: String,
}

impl DocumentInput {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
        }
    }
}

/// A chunk returned from a similarity search, with its score.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    pub score: f32,
}
