//! Concierge CLI
//!
//! Main entry point for the concierge command-line tool. Ingests
//! per-domain documents from disk, builds the routed retrieval pipeline,
//! and serves queries one-shot or as an interactive chat.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand};
use concierge_core::{config::AppConfig, logging, ConciergeResult};
use std::path::PathBuf;

/// Concierge CLI - multi-domain assistant with routed retrieval
#[derive(Parser, Debug)]
#[command(name = "concierge")]
#[command(about = "Multi-domain concierge assistant with routed retrieval", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "CONCIERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing per-domain documents
    #[arg(short, long, global = true, env = "CONCIERGE_DOCS", default_value = "docs")]
    docs: PathBuf,

    /// Provider base URL
    #[arg(long, global = true, env = "CONCIERGE_ENDPOINT")]
    endpoint: Option<String>,

    /// Completion model identifier
    #[arg(short, long, global = true, env = "CONCIERGE_MODEL")]
    model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Interactive chat session
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> ConciergeResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?.with_overrides(
        cli.config,
        cli.endpoint,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Concierge starting");
    tracing::debug!("Provider endpoint: {}", config.provider.endpoint);
    tracing::debug!("Model: {}", config.provider.model);
    tracing::debug!("Documents directory: {:?}", cli.docs);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config, &cli.docs).await,
        Commands::Chat(cmd) => cmd.execute(&config, &cli.docs).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
