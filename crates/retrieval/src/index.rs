//! In-memory semantic index, one per domain.
//!
//! An index is built once at startup from its domain's chunks and is
//! read-only afterwards, so concurrent searches need no locking. There
//! is no incremental update: rebuilding means discarding the index and
//! creating a new one.

use crate::embeddings::EmbeddingProvider;
use crate::types::{Chunk, RetrievedChunk};
use concierge_core::{ConciergeError, ConciergeResult};
use std::cmp::Ordering;
use std::sync::Arc;

struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Semantic search index over one domain's chunks.
pub struct DomainIndex {
    domain: String,
    entries: Vec<IndexEntry>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl DomainIndex {
    /// Build an index by embedding every chunk with the given provider.
    ///
    /// # Errors
    /// - `ConciergeError::EmptyCorpus` if `chunks` is empty: a domain
    ///   without text must not be queryable.
    /// - `ConciergeError::EmbeddingProvider` if embedding fails.
    pub async fn build(
        domain: impl Into<String>,
        chunks: Vec<Chunk>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> ConciergeResult<Self> {
        let domain = domain.into();

        if chunks.is_empty() {
            return Err(ConciergeError::EmptyCorpus(domain));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = provider.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(ConciergeError::EmbeddingProvider(format!(
                "provider returned {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect::<Vec<_>>();

        tracing::info!(
            domain = %domain,
            chunks = entries.len(),
            provider = provider.provider_name(),
            model = provider.model_name(),
            "Built domain index"
        );

        Ok(Self {
            domain,
            entries,
            provider,
        })
    }

    /// Search for the `k` chunks most similar to the query.
    ///
    /// Results are ordered by descending cosine similarity; ties break
    /// by ascending `sequence_index`, then `source_id`, so ranking is
    /// deterministic.
    ///
    /// # Errors
    /// - `ConciergeError::InvalidArgument` if `k` is zero.
    /// - `ConciergeError::EmbeddingProvider` if the query embedding fails.
    pub async fn search(&self, query: &str, k: usize) -> ConciergeResult<Vec<RetrievedChunk>> {
        if k == 0 {
            return Err(ConciergeError::InvalidArgument(
                "k must be a positive integer".to_string(),
            ));
        }

        let query_embedding = self.provider.embed(query).await?;

        let mut results: Vec<RetrievedChunk> = self
            .entries
            .iter()
            .map(|entry| RetrievedChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| match b.score.partial_cmp(&a.score) {
            Some(Ordering::Equal) | None => a
                .chunk
                .sequence_index
                .cmp(&b.chunk.sequence_index)
                .then_with(|| a.chunk.source_id.cmp(&b.chunk.source_id)),
            Some(ordering) => ordering,
        });
        results.truncate(k);

        tracing::debug!(
            domain = %self.domain,
            retrieved = results.len(),
            requested = k,
            "Retrieved chunks"
        );

        Ok(results)
    }

    /// Name of the domain this index serves.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;

    fn chunk(text: &str, source_id: &str, sequence_index: u32) -> Chunk {
        Chunk {
            text: text.to_string(),
            source_id: source_id.to_string(),
            domain: "dining".to_string(),
            sequence_index,
        }
    }

    fn provider() -> Arc<dyn EmbeddingProvider> {
        Arc::new(TrigramProvider::new(384))
    }

    #[tokio::test]
    async fn test_build_empty_corpus_fails() {
        let result = DomainIndex::build("dining", vec![], provider()).await;
        assert!(matches!(result, Err(ConciergeError::EmptyCorpus(d)) if d == "dining"));
    }

    #[tokio::test]
    async fn test_exact_text_round_trip_ranks_first() {
        let chunks = vec![
            chunk("Breakfast is served from 7 to 10 in the morning", "menu", 0),
            chunk("The tasting dinner requires a reservation", "menu", 1),
            chunk("Room service pasta arrives within thirty minutes", "menu", 2),
        ];
        let index = DomainIndex::build("dining", chunks, provider()).await.unwrap();

        let results = index
            .search("The tasting dinner requires a reservation", 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.sequence_index, 1);
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_search_rejects_zero_k() {
        let index = DomainIndex::build("dining", vec![chunk("menu text here", "menu", 0)], provider())
            .await
            .unwrap();

        let result = index.search("anything", 0).await;
        assert!(matches!(result, Err(ConciergeError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_k_larger_than_corpus_returns_all() {
        let index = DomainIndex::build("dining", vec![chunk("only entry", "menu", 0)], provider())
            .await
            .unwrap();

        let results = index.search("only entry", 4).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_ties_break_by_sequence_then_source() {
        // Identical text gives identical embeddings, so all scores tie
        let chunks = vec![
            chunk("pool towels available", "b-source", 3),
            chunk("pool towels available", "a-source", 3),
            chunk("pool towels available", "a-source", 1),
        ];
        let index = DomainIndex::build("wellness", chunks, provider()).await.unwrap();

        let results = index.search("pool towels available", 3).await.unwrap();
        assert_eq!(results[0].chunk.sequence_index, 1);
        assert_eq!(results[1].chunk.source_id, "a-source");
        assert_eq!(results[2].chunk.source_id, "b-source");
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        #[derive(Debug)]
        struct FailingProvider;

        #[async_trait::async_trait]
        impl EmbeddingProvider for FailingProvider {
            fn provider_name(&self) -> &str {
                "failing"
            }
            fn model_name(&self) -> &str {
                "failing"
            }
            fn dimensions(&self) -> usize {
                4
            }
            async fn embed_batch(&self, _texts: &[String]) -> ConciergeResult<Vec<Vec<f32>>> {
                Err(ConciergeError::EmbeddingProvider("provider down".to_string()))
            }
        }

        let result =
            DomainIndex::build("dining", vec![chunk("text", "menu", 0)], Arc::new(FailingProvider))
                .await;
        assert!(matches!(result, Err(ConciergeError::EmbeddingProvider(_))));
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!((cosine_similarity(&a, &[0.0, 1.0, 0.0])).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
    }
}
