//! Embedding provider trait and factory.

use concierge_core::{ConciergeError, ConciergeResult, ProviderSettings};
use std::sync::Arc;
use std::time::Duration;

/// Trait for embedding providers.
///
/// Given text, return a fixed-dimension vector. Failures and timeouts
/// surface as `ConciergeError::EmbeddingProvider` so callers can
/// distinguish "provider down" from "no relevant text".
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> ConciergeResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> ConciergeResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results.pop().ok_or_else(|| {
            ConciergeError::EmbeddingProvider("No embedding returned".to_string())
        })
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(
    settings: &ProviderSettings,
    timeout: Duration,
) -> ConciergeResult<Arc<dyn EmbeddingProvider>> {
    match settings.embedding_provider.as_str() {
        "trigram" => {
            let provider =
                super::providers::trigram::TrigramProvider::new(settings.embedding_dimensions);
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let provider = super::providers::ollama::OllamaEmbedder::new(
                &settings.endpoint,
                &settings.embedding_model,
                settings.embedding_dimensions,
                timeout,
            )?;
            Ok(Arc::new(provider))
        }

        other => Err(ConciergeError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            other
        ))),
    }
}
