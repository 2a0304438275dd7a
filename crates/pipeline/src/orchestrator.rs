//! Pipeline orchestration.
//!
//! Wires the router and composer into the single `handle` entry point:
//! validate → classify → resolve → compose → record. Router output
//! failures degrade to the default path; everything else surfaces to the
//! request boundary where `respond` converts it into a generic
//! user-facing message. No failure is fatal to the process — every
//! request is isolated from the next.

use crate::composer::{Composer, DomainHandle};
use crate::history::ConversationHistory;
use crate::router::{Destination, RouteDecision, Router};
use concierge_core::{AppConfig, ConciergeError, ConciergeResult};
use concierge_llm::LlmClient;
use concierge_prompt::PromptCatalog;
use concierge_retrieval::{Chunk, Chunker, DocumentInput, DomainIndex, EmbeddingProvider};
use std::collections::HashMap;
use std::sync::Arc;

/// Message returned for blank queries.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query.";

/// Generic message returned for internal failures. Internal error detail
/// is logged, never shown to the caller.
pub const FAILURE_MESSAGE: &str = "An error occurred while processing your request.";

/// HTTP-equivalent outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    /// Answered (2xx-equivalent)
    Ok,

    /// Rejected input (400-equivalent)
    ClientError,

    /// Internal failure (500-equivalent)
    ServerError,
}

/// A user-facing reply that never carries internal error detail.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub status: ReplyStatus,
}

/// The assembled query-answering pipeline.
pub struct Pipeline {
    router: Router,
    composer: Composer,
    domains: HashMap<String, DomainHandle>,
    history: Arc<ConversationHistory>,
}

impl Pipeline {
    /// Start building a pipeline from configuration and providers.
    pub fn builder(
        config: AppConfig,
        client: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> PipelineBuilder {
        PipelineBuilder {
            config,
            client,
            embedder,
            documents: HashMap::new(),
            history: None,
        }
    }

    /// Answer a query.
    ///
    /// # Errors
    /// - `ConciergeError::EmptyQuery` for blank input (rejected before
    ///   any provider call).
    /// - Provider and retrieval errors, already logged with request
    ///   context. Router parse/validation failures are not errors here:
    ///   they degrade to the default path.
    pub async fn handle(&self, query: &str) -> ConciergeResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ConciergeError::EmptyQuery);
        }

        let decision = match self.router.classify(query).await {
            Ok(decision) => decision,
            Err(
                err @ (ConciergeError::RouterParse(_) | ConciergeError::UnknownDestination(_)),
            ) => {
                tracing::warn!(query, cause = %err, "Router reply rejected; taking the default path");
                RouteDecision::default_path(query)
            }
            Err(err) => {
                tracing::error!(query, stage = "router", cause = %err, "Routing failed");
                return Err(err);
            }
        };

        let domain = match &decision.destination {
            Destination::Default => None,
            Destination::Domain(name) => match self.domains.get(name) {
                Some(handle) => Some(handle),
                None => {
                    tracing::warn!(
                        query,
                        domain = %name,
                        "Routed to a domain with no searchable index; taking the default path"
                    );
                    None
                }
            },
        };

        let answer = match self.composer.answer(&decision.normalized_query, domain).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!(query, stage = "composer", cause = %err, "Answer composition failed");
                return Err(err);
            }
        };

        // Record the exchange only once the answer exists: a failed or
        // cancelled request leaves no partial turns behind
        self.history.append_exchange(query, &answer);

        Ok(answer)
    }

    /// Answer a query, mapping every outcome to a user-facing reply.
    ///
    /// This is the inbound adapter for HTTP-like callers: blank input
    /// maps to a client error, internal failures map to a server error
    /// with a generic message.
    pub async fn respond(&self, query: &str) -> Reply {
        match self.handle(query).await {
            Ok(text) => Reply {
                text,
                status: ReplyStatus::Ok,
            },
            Err(ConciergeError::EmptyQuery) => Reply {
                text: EMPTY_QUERY_MESSAGE.to_string(),
                status: ReplyStatus::ClientError,
            },
            Err(_) => Reply {
                text: FAILURE_MESSAGE.to_string(),
                status: ReplyStatus::ServerError,
            },
        }
    }

    /// The conversation history this pipeline appends to.
    pub fn history(&self) -> Arc<ConversationHistory> {
        Arc::clone(&self.history)
    }

    /// Whether a domain has a searchable index.
    pub fn is_queryable(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }
}

/// Builder that ingests documents and constructs the domain indexes.
pub struct PipelineBuilder {
    config: AppConfig,
    client: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingProvider>,
    documents: HashMap<String, Vec<DocumentInput>>,
    history: Option<Arc<ConversationHistory>>,
}

impl PipelineBuilder {
    /// Add source documents for one domain.
    pub fn ingest(mut self, domain: &str, documents: Vec<DocumentInput>) -> Self {
        self.documents
            .entry(domain.to_string())
            .or_default()
            .extend(documents);
        self
    }

    /// Use an externally owned history (e.g., one per session).
    pub fn with_history(mut self, history: Arc<ConversationHistory>) -> Self {
        self.history = Some(history);
        self
    }

    /// Chunk every document and build one index per domain.
    ///
    /// Domains that end up with zero chunks are left unqueryable: the
    /// orchestrator will answer queries routed there on the default path.
    pub async fn build(self) -> ConciergeResult<Pipeline> {
        let Self {
            config,
            client,
            embedder,
            mut documents,
            history,
        } = self;

        config.validate()?;

        for name in documents.keys() {
            if config.domain(name).is_none() {
                return Err(ConciergeError::InvalidArgument(format!(
                    "documents ingested for unknown domain '{}'",
                    name
                )));
            }
        }

        let chunker = Chunker::new(config.pipeline.chunk_size, config.pipeline.overlap)?;
        let catalog = Arc::new(PromptCatalog::new()?);

        let mut pending = Vec::new();
        for profile in &config.domains {
            let docs = documents.remove(&profile.name).unwrap_or_default();
            let chunks: Vec<Chunk> = docs
                .iter()
                .flat_map(|doc| chunker.split(&doc.text, &doc.source_id, &profile.name))
                .collect();

            if chunks.is_empty() {
                tracing::warn!(
                    domain = %profile.name,
                    "No chunks for domain; it will not be queryable"
                );
                continue;
            }

            tracing::debug!(
                domain = %profile.name,
                sources = docs.len(),
                chunks = chunks.len(),
                "Prepared domain corpus"
            );
            pending.push((profile.clone(), chunks));
        }

        // Indexes are independent; build them concurrently
        let builds = pending.into_iter().map(|(profile, chunks)| {
            let embedder = Arc::clone(&embedder);
            async move {
                let index = DomainIndex::build(profile.name.clone(), chunks, embedder).await?;
                Ok::<_, ConciergeError>(DomainHandle {
                    profile,
                    index: Arc::new(index),
                })
            }
        });
        let handles = futures::future::try_join_all(builds).await?;

        let domains: HashMap<String, DomainHandle> = handles
            .into_iter()
            .map(|handle| (handle.profile.name.clone(), handle))
            .collect();

        let router = Router::new(
            Arc::clone(&client),
            Arc::clone(&catalog),
            config.domains.clone(),
            config.provider.model.clone(),
        );
        let composer = Composer::new(
            client,
            catalog,
            config.provider.model.clone(),
            config.pipeline.top_k,
            config.pipeline.min_score,
        );

        Ok(Pipeline {
            router,
            composer,
            domains,
            history: history.unwrap_or_else(|| Arc::new(ConversationHistory::new())),
        })
    }
}
