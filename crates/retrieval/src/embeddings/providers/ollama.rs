//! Ollama embedding provider.
//!
//! Generates semantic embeddings via Ollama's local `/api/embeddings`
//! endpoint using models like nomic-embed-text. Calls are single-attempt
//! and timeout-bounded; failures surface as embedding-provider errors
//! rather than empty results.

use crate::embeddings::provider::EmbeddingProvider;
use concierge_core::{ConciergeError, ConciergeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Request payload for the Ollama embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

/// Response from the Ollama embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Error response from the Ollama API.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Ollama embedding provider using the local API.
#[derive(Debug)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder.
    pub fn new(
        base_url: &str,
        model: &str,
        dimensions: usize,
        timeout: Duration,
    ) -> ConciergeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ConciergeError::Config(format!("Failed to create HTTP client for Ollama: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
            dimensions,
            timeout,
        })
    }

    async fn embed_single(&self, text: &str) -> ConciergeResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);

        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConciergeError::EmbeddingProvider(format!(
                        "Ollama embedding request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    ConciergeError::EmbeddingProvider(format!(
                        "Failed to send embedding request to Ollama: {}",
                        e
                    ))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(ConciergeError::EmbeddingProvider(format!(
                    "Ollama API error ({}): {}",
                    status, parsed.error
                )));
            }

            return Err(ConciergeError::EmbeddingProvider(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response.json().await.map_err(|e| {
            ConciergeError::EmbeddingProvider(format!("Failed to parse Ollama response: {}", e))
        })?;

        // A dimension mismatch means build and query would silently use
        // incompatible vector spaces
        if body.embedding.len() != self.dimensions {
            return Err(ConciergeError::EmbeddingProvider(format!(
                "Ollama model '{}' returned {} dimensions, expected {}",
                self.model,
                body.embedding.len(),
                self.dimensions
            )));
        }

        Ok(body.embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> ConciergeResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!(batch_size = texts.len(), model = %self.model, "Embedding batch");

        // Ollama has no batch endpoint; embed sequentially
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            if text.trim().is_empty() {
                return Err(ConciergeError::InvalidArgument(
                    "cannot embed empty text".to_string(),
                ));
            }
            embeddings.push(self.embed_single(text).await?);
        }

        Ok(embeddings)
    }
}
