//! Query-answering pipeline for the concierge assistant.
//!
//! Routes each query to a domain (or the default path), retrieves
//! matching passages from that domain's index, and composes a grounded
//! answer:
//!
//! - `router`: LLM classification under a strict JSON contract
//! - `composer`: retrieval + grounded answer generation
//! - `history`: shared append-only conversation log
//! - `orchestrator`: the `handle`/`respond` entry points

pub mod composer;
pub mod history;
pub mod orchestrator;
pub mod router;

// Re-export main types
pub use composer::{Composer, DomainHandle};
pub use history::{ConversationHistory, Role, Turn};
pub use orchestrator::{
    Pipeline, PipelineBuilder, Reply, ReplyStatus, EMPTY_QUERY_MESSAGE, FAILURE_MESSAGE,
};
pub use router::{Destination, RouteDecision, Router};
