//! Chat command handler.
//!
//! Interactive REPL over stdin. Every reply is printable: internal
//! failures come back as generic messages and the loop keeps serving.

use clap::Args;
use concierge_core::{AppConfig, ConciergeResult};
use std::io::{BufRead, Write};
use std::path::Path;

/// Interactive chat session
#[derive(Args, Debug)]
pub struct ChatCommand {}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig, docs_dir: &Path) -> ConciergeResult<()> {
        tracing::info!("Starting chat session");

        let pipeline = super::build_pipeline(config, docs_dir).await?;

        println!("Hello! I'm your Concierge AI Assistant. How can I help you today?");
        println!("(type 'exit' to quit)");

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        let mut line = String::new();

        loop {
            print!("> ");
            stdout.flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let query = line.trim();
            if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
                break;
            }

            let reply = pipeline.respond(query).await;
            println!("{}", reply.text);
        }

        tracing::debug!(turns = pipeline.history().len(), "Chat session ended");
        Ok(())
    }
}
