//! Built-in prompt templates.
//!
//! Three templates cover the whole pipeline: routing classification, the
//! grounded domain answer, and the default (non-retrieval) answer.

/// Router classification prompt.
///
/// The model is instructed to emit exactly one JSON object; the reply is
/// still parsed defensively because compliance is never guaranteed.
pub const ROUTER: &str = r#"Given a user's question, determine the most relevant domain to route it to.
The available domains are:
{{domains}}
If the question does not fit any of the domains, categorize it as "default".

Respond with a single JSON object. The JSON object should have two keys: 'destination' and 'next_inputs'. The value of 'destination' should be the name of the most relevant domain or 'default' if none apply. The value of 'next_inputs' should be the original user question as a string.

Example JSON:
{
  "destination": "rooms",
  "next_inputs": "What time is check-in?"
}

Question: {{query}}
Response:
"#;

/// Grounded domain answer prompt.
///
/// The only-use-this-context instruction is the grounding constraint:
/// the model must refuse rather than speculate beyond the passages.
pub const DOMAIN_ANSWER: &str = r#"You are a concierge AI assistant for a luxury hotel, specializing in {{specialty}}.
Answer the user's question based ONLY on the following context. If the answer is not
in the context, state that you cannot provide information on that topic.

Context:
{{context}}

Question:
{{query}}
"#;

/// Default answer prompt for queries outside every domain.
pub const DEFAULT_ANSWER: &str = r#"You are a general concierge AI assistant. You cannot provide information about specific hotel policies, dining, or wellness services. Please state that you can only answer general questions.

User's question: {{query}}
"#;
