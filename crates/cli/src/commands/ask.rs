//! Ask command handler.
//!
//! Builds the pipeline, answers a single question, and prints the reply.

use clap::Args;
use concierge_core::{AppConfig, ConciergeResult};
use concierge_pipeline::ReplyStatus;
use std::path::Path;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig, docs_dir: &Path) -> ConciergeResult<()> {
        tracing::info!("Executing ask command");

        let pipeline = super::build_pipeline(config, docs_dir).await?;
        let reply = pipeline.respond(&self.query).await;

        if self.json {
            let output = serde_json::json!({
                "response": reply.text,
                "status": match reply.status {
                    ReplyStatus::Ok => "ok",
                    ReplyStatus::ClientError => "client_error",
                    ReplyStatus::ServerError => "server_error",
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", reply.text);
        }

        Ok(())
    }
}
