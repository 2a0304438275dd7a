//! LLM provider factory.
//!
//! Creates the completion client for the configured endpoint.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use concierge_core::{ConciergeError, ConciergeResult, ProviderSettings};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client from provider settings.
///
/// # Errors
/// Returns `ConciergeError::Config` if the settings are unusable or the
/// client cannot be initialized.
pub fn create_client(settings: &ProviderSettings, timeout: Duration) -> ConciergeResult<Arc<dyn LlmClient>> {
    match settings.endpoint.as_str() {
        "" => Err(ConciergeError::Config(
            "provider endpoint must not be empty".to_string(),
        )),
        endpoint => {
            let client = OllamaClient::new(endpoint, timeout)?;
            Ok(Arc::new(client))
        }
    }
}
