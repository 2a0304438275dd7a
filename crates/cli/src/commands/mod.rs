//! Command handlers and shared pipeline setup.

mod ask;
mod chat;

pub use ask::AskCommand;
pub use chat::ChatCommand;

use concierge_core::{AppConfig, ConciergeResult, DomainProfile};
use concierge_pipeline::Pipeline;
use concierge_retrieval::DocumentInput;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Build the pipeline from configuration and on-disk documents.
pub(crate) async fn build_pipeline(config: &AppConfig, docs_dir: &Path) -> ConciergeResult<Pipeline> {
    let timeout = Duration::from_secs(config.pipeline.provider_timeout_secs);
    let client = concierge_llm::create_client(&config.provider, timeout)?;
    let embedder = concierge_retrieval::create_provider(&config.provider, timeout)?;

    let documents = load_domain_documents(docs_dir, &config.domains)?;

    let mut builder = Pipeline::builder(config.clone(), client, embedder);
    for (domain, docs) in documents {
        builder = builder.ingest(&domain, docs);
    }
    builder.build().await
}

/// Load `(text, source_id)` pairs for each registered domain.
///
/// Looks for `<dir>/<domain>.txt` and any files under `<dir>/<domain>/`.
/// Domains with no documents are skipped; the pipeline leaves them
/// unqueryable and answers their queries on the default path.
pub(crate) fn load_domain_documents(
    dir: &Path,
    domains: &[DomainProfile],
) -> ConciergeResult<HashMap<String, Vec<DocumentInput>>> {
    let mut result = HashMap::new();

    for profile in domains {
        let mut docs = Vec::new();

        let flat = dir.join(format!("{}.txt", profile.name));
        if flat.is_file() {
            let text = std::fs::read_to_string(&flat)?;
            docs.push(DocumentInput::new(text, format!("{}.txt", profile.name)));
        }

        let nested = dir.join(&profile.name);
        if nested.is_dir() {
            for entry in walkdir::WalkDir::new(&nested)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let text = std::fs::read_to_string(entry.path())?;
                let source_id = entry
                    .path()
                    .strip_prefix(dir)
                    .unwrap_or(entry.path())
                    .to_string_lossy()
                    .to_string();
                docs.push(DocumentInput::new(text, source_id));
            }
        }

        if docs.is_empty() {
            tracing::warn!(
                domain = %profile.name,
                dir = %dir.display(),
                "No documents found for domain"
            );
        } else {
            tracing::info!(
                domain = %profile.name,
                sources = docs.len(),
                "Loaded domain documents"
            );
            result.insert(profile.name.clone(), docs);
        }
    }

    Ok(result)
}
