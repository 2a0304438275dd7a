//! Retrieval-augmented answer composition.
//!
//! Given a resolved domain (or none), fetch the top-matching chunks and
//! ask the language model to answer from that context alone. Without a
//! domain, the default prompt produces a general, non-retrieval answer.

use concierge_core::{ConciergeResult, DomainProfile};
use concierge_llm::{LlmClient, LlmRequest};
use concierge_prompt::PromptCatalog;
use concierge_retrieval::{DomainIndex, RetrievedChunk};
use std::sync::Arc;

/// A queryable domain: its profile plus the built index.
pub struct DomainHandle {
    pub profile: DomainProfile,
    pub index: Arc<DomainIndex>,
}

/// Composes answers from retrieved context.
pub struct Composer {
    client: Arc<dyn LlmClient>,
    catalog: Arc<PromptCatalog>,
    model: String,
    top_k: usize,
    min_score: Option<f32>,
}

impl Composer {
    pub fn new(
        client: Arc<dyn LlmClient>,
        catalog: Arc<PromptCatalog>,
        model: impl Into<String>,
        top_k: usize,
        min_score: Option<f32>,
    ) -> Self {
        Self {
            client,
            catalog,
            model: model.into(),
            top_k,
            min_score,
        }
    }

    /// Answer a query, grounded in the given domain's corpus when set.
    ///
    /// # Errors
    /// - `ConciergeError::EmbeddingProvider` / `InvalidArgument` from
    ///   retrieval.
    /// - `ConciergeError::AnswerGeneration` if the model call fails.
    pub async fn answer(
        &self,
        query: &str,
        domain: Option<&DomainHandle>,
    ) -> ConciergeResult<String> {
        let prompt = match domain {
            None => self.catalog.render_default_answer(query)?,
            Some(handle) => {
                let mut retrieved = handle.index.search(query, self.top_k).await?;

                if let Some(threshold) = self.min_score {
                    let before = retrieved.len();
                    retrieved.retain(|r| r.score >= threshold);
                    if retrieved.len() < before {
                        tracing::debug!(
                            domain = %handle.profile.name,
                            dropped = before - retrieved.len(),
                            threshold,
                            "Dropped low-scoring chunks"
                        );
                    }
                }

                tracing::debug!(
                    domain = %handle.profile.name,
                    chunks = retrieved.len(),
                    "Composing grounded answer"
                );

                let context = build_context(&retrieved);
                self.catalog
                    .render_domain_answer(&handle.profile.specialty, &context, query)?
            }
        };

        let request = LlmRequest::new(prompt, &self.model).with_temperature(0.0);
        let response = self.client.complete(&request).await?;

        Ok(response.content)
    }
}

/// Join retrieved chunks into one context block, each passage labelled
/// so the model can tell them apart.
fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, retrieved)| format!("[Passage {}]\n{}", i + 1, retrieved.chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
