//! crst CLI - Entry point
//!
//! Usage: crst <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crst::cli::{Cli, Commands};
use crst::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; --verbose lowers the default filter, RUST_LOG
    // still wins when set
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    // One config load per invocation; commands receive it by reference
    let config = Config::load()?;

    match cli.command {
        Commands::Question(args) => crst::cli::question::run(args, &config),
        Commands::Answer(args) => crst::cli::answer::run(args, &config),
        Commands::Thought(args) => crst::cli::thought::run(args, &config),
        Commands::Backup(args) => crst::cli::backup::run(args, &config),
        Commands::Enrich(args) => crst::cli::enrich::run(args, &config).await,
        Commands::Suggest(args) => crst::cli::suggest::run(args, &config).await,
        Commands::Search(args) => crst::cli::search::run(args, &config).await,
    }
}
