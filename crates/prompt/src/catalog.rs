//! Prompt catalog with typed render methods.

use crate::templates;
use concierge_core::{ConciergeError, ConciergeResult, DomainProfile};
use handlebars::Handlebars;
use serde_json::json;

const ROUTER_TEMPLATE: &str = "router";
const DOMAIN_ANSWER_TEMPLATE: &str = "domain_answer";
const DEFAULT_ANSWER_TEMPLATE: &str = "default_answer";

/// Registry of the pipeline's prompt templates.
pub struct PromptCatalog {
    registry: Handlebars<'static>,
}

impl PromptCatalog {
    /// Create a catalog with all built-in templates registered.
    pub fn new() -> ConciergeResult<Self> {
        let mut registry = Handlebars::new();

        // Plain text prompts, no HTML escaping
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(ROUTER_TEMPLATE, templates::ROUTER)
            .map_err(|e| ConciergeError::Prompt(format!("Failed to register template: {}", e)))?;
        registry
            .register_template_string(DOMAIN_ANSWER_TEMPLATE, templates::DOMAIN_ANSWER)
            .map_err(|e| ConciergeError::Prompt(format!("Failed to register template: {}", e)))?;
        registry
            .register_template_string(DEFAULT_ANSWER_TEMPLATE, templates::DEFAULT_ANSWER)
            .map_err(|e| ConciergeError::Prompt(format!("Failed to register template: {}", e)))?;

        tracing::debug!("Registered prompt templates");

        Ok(Self { registry })
    }

    /// Render the router classification prompt for a set of domains.
    pub fn render_router(
        &self,
        domains: &[DomainProfile],
        query: &str,
    ) -> ConciergeResult<String> {
        let listing = domains
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{}. {}: For questions about {}.", i + 1, d.name, d.scope))
            .collect::<Vec<_>>()
            .join("\n");

        self.render(
            ROUTER_TEMPLATE,
            &json!({ "domains": listing, "query": query }),
        )
    }

    /// Render the grounded answer prompt for one domain.
    pub fn render_domain_answer(
        &self,
        specialty: &str,
        context: &str,
        query: &str,
    ) -> ConciergeResult<String> {
        self.render(
            DOMAIN_ANSWER_TEMPLATE,
            &json!({ "specialty": specialty, "context": context, "query": query }),
        )
    }

    /// Render the default (non-retrieval) answer prompt.
    pub fn render_default_answer(&self, query: &str) -> ConciergeResult<String> {
        self.render(DEFAULT_ANSWER_TEMPLATE, &json!({ "query": query }))
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> ConciergeResult<String> {
        self.registry
            .render(name, data)
            .map_err(|e| ConciergeError::Prompt(format!("Failed to render template: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PromptCatalog {
        PromptCatalog::new().unwrap()
    }

    fn domains() -> Vec<DomainProfile> {
        vec![
            DomainProfile::new("dining", "restaurants, menus, and dining hours", "dining"),
            DomainProfile::new(
                "rooms",
                "room types, amenities, and hotel policies like check-in/out",
                "rooms and hotel policies",
            ),
        ]
    }

    #[test]
    fn test_router_prompt_lists_domains() {
        let prompt = catalog()
            .render_router(&domains(), "What time is check-in?")
            .unwrap();

        assert!(prompt.contains("1. dining: For questions about restaurants, menus, and dining hours."));
        assert!(prompt.contains("2. rooms: For questions about"));
        assert!(prompt.contains("single JSON object"));
        assert!(prompt.contains("Question: What time is check-in?"));
    }

    #[test]
    fn test_domain_answer_prompt_carries_context_and_grounding() {
        let prompt = catalog()
            .render_domain_answer(
                "dining",
                "[Passage 1]\nBreakfast served 7-10am",
                "When is breakfast?",
            )
            .unwrap();

        assert!(prompt.contains("specializing in dining"));
        assert!(prompt.contains("based ONLY on the following context"));
        assert!(prompt.contains("Breakfast served 7-10am"));
        assert!(prompt.contains("When is breakfast?"));
    }

    #[test]
    fn test_default_answer_prompt() {
        let prompt = catalog().render_default_answer("What's the weather?").unwrap();

        assert!(prompt.contains("general concierge AI assistant"));
        assert!(prompt.contains("cannot provide information about specific hotel policies"));
        assert!(prompt.contains("What's the weather?"));
    }

    #[test]
    fn test_no_html_escaping() {
        let prompt = catalog().render_default_answer("Is 5 < 7 & 9 > 3?").unwrap();
        assert!(prompt.contains("Is 5 < 7 & 9 > 3?"));
    }
}
