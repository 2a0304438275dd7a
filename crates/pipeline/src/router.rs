//! Query routing via LLM classification.
//!
//! The router asks the language model to classify a query into one of
//! the registered domains or "default", under a strict JSON output
//! contract. The model's reply is untrusted input: it is parsed and
//! validated, never assumed compliant. Routing is stateless — it looks
//! only at the current query, never at conversation history.

use concierge_core::{ConciergeError, ConciergeResult, DomainProfile};
use concierge_llm::{LlmClient, LlmRequest};
use concierge_prompt::PromptCatalog;
use serde::Deserialize;
use std::sync::Arc;

/// Where a query should be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A registered domain, by name
    Domain(String),

    /// The non-retrieval fallback path
    Default,
}

/// The router's verdict for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub destination: Destination,

    /// The query as echoed (possibly normalized) by the model
    pub normalized_query: String,
}

impl RouteDecision {
    /// A decision that sends the query down the default path unchanged.
    pub fn default_path(query: &str) -> Self {
        Self {
            destination: Destination::Default,
            normalized_query: query.to_string(),
        }
    }
}

/// Shape the model is instructed to reply with.
#[derive(Debug, Deserialize)]
struct RawRoute {
    destination: String,
    next_inputs: String,
}

/// Classifies queries into domains.
pub struct Router {
    client: Arc<dyn LlmClient>,
    catalog: Arc<PromptCatalog>,
    domains: Vec<DomainProfile>,
    model: String,
}

impl Router {
    pub fn new(
        client: Arc<dyn LlmClient>,
        catalog: Arc<PromptCatalog>,
        domains: Vec<DomainProfile>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            catalog,
            domains,
            model: model.into(),
        }
    }

    /// Classify a query into a domain or the default path.
    ///
    /// # Errors
    /// - `ConciergeError::RouterParse` if the reply is not valid JSON or
    ///   lacks the required keys.
    /// - `ConciergeError::UnknownDestination` if the reply names a
    ///   destination outside the registry.
    /// - `ConciergeError::AnswerGeneration` if the model call itself fails.
    pub async fn classify(&self, query: &str) -> ConciergeResult<RouteDecision> {
        let prompt = self.catalog.render_router(&self.domains, query)?;
        let request = LlmRequest::new(prompt, &self.model).with_temperature(0.0);

        let response = self.client.complete(&request).await?;
        let decision = self.parse_reply(&response.content, query)?;

        tracing::debug!(query, destination = ?decision.destination, "Routed query");
        Ok(decision)
    }

    fn parse_reply(&self, raw: &str, query: &str) -> ConciergeResult<RouteDecision> {
        let body = strip_code_fence(raw);

        let route: RawRoute = serde_json::from_str(body).map_err(|e| {
            ConciergeError::RouterParse(format!("{} (reply: {})", e, preview(raw)))
        })?;

        let destination = if route.destination == "default" {
            Destination::Default
        } else if self.domains.iter().any(|d| d.name == route.destination) {
            Destination::Domain(route.destination)
        } else {
            return Err(ConciergeError::UnknownDestination(route.destination));
        };

        // A model that drops the echoed query must not blank the request
        let normalized_query = if route.next_inputs.trim().is_empty() {
            query.to_string()
        } else {
            route.next_inputs
        };

        Ok(RouteDecision {
            destination,
            normalized_query,
        })
    }
}

/// Strip a surrounding markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.trim_start().strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

/// Bounded preview of a model reply for error messages.
fn preview(raw: &str) -> String {
    const MAX: usize = 120;
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::config::default_domains;
    use concierge_llm::{LlmResponse, LlmUsage};

    struct CannedClient {
        reply: String,
    }

    #[async_trait::async_trait]
    impl LlmClient for CannedClient {
        fn provider_name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: &LlmRequest) -> ConciergeResult<LlmResponse> {
            Ok(LlmResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    fn router(reply: &str) -> Router {
        Router::new(
            Arc::new(CannedClient {
                reply: reply.to_string(),
            }),
            Arc::new(PromptCatalog::new().unwrap()),
            default_domains(),
            "test-model",
        )
    }

    #[tokio::test]
    async fn test_valid_json_routes_to_domain() {
        let router = router(r#"{"destination": "rooms", "next_inputs": "What time is check-in?"}"#);
        let decision = router.classify("What time is check-in?").await.unwrap();

        assert_eq!(decision.destination, Destination::Domain("rooms".to_string()));
        assert_eq!(decision.normalized_query, "What time is check-in?");
    }

    #[tokio::test]
    async fn test_default_destination() {
        let router = router(r#"{"destination": "default", "next_inputs": "Tell me a joke"}"#);
        let decision = router.classify("Tell me a joke").await.unwrap();

        assert_eq!(decision.destination, Destination::Default);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_parse_error() {
        let router = router("I think rooms");
        let result = router.classify("What time is check-in?").await;

        assert!(matches!(result, Err(ConciergeError::RouterParse(_))));
    }

    #[tokio::test]
    async fn test_missing_keys_is_parse_error() {
        let router = router(r#"{"destination": "rooms"}"#);
        let result = router.classify("What time is check-in?").await;

        assert!(matches!(result, Err(ConciergeError::RouterParse(_))));
    }

    #[tokio::test]
    async fn test_unknown_destination_rejected() {
        let router = router(r#"{"destination": "casino", "next_inputs": "Where are the slots?"}"#);
        let result = router.classify("Where are the slots?").await;

        assert!(matches!(
            result,
            Err(ConciergeError::UnknownDestination(d)) if d == "casino"
        ));
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let router = router(
            "```json\n{\"destination\": \"wellness\", \"next_inputs\": \"When does the pool open?\"}\n```",
        );
        let decision = router.classify("When does the pool open?").await.unwrap();

        assert_eq!(
            decision.destination,
            Destination::Domain("wellness".to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_next_inputs_falls_back_to_query() {
        let router = router(r#"{"destination": "dining", "next_inputs": ""}"#);
        let decision = router.classify("When is breakfast?").await.unwrap();

        assert_eq!(decision.normalized_query, "When is breakfast?");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        // Unterminated fence is left alone
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "```json\n{\"a\": 1}");
    }
}
