//! `crst search` command
//!
//! Direct web search through the configured SearxNG instance.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::Config;
use crate::search::SearchClient;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = 5)]
    pub num_results: usize,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value_t = 30)]
    pub timeout: u64,
}

pub async fn run(args: SearchArgs, config: &Config) -> Result<()> {
    let client = SearchClient::from_config(&config.search)?;
    let results = client
        .search(
            &args.query,
            args.num_results,
            Duration::from_secs(args.timeout),
        )
        .await?;

    if results.is_empty() {
        println!("No results for '{}'.", args.query);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}. {} ({})", i + 1, result.title.bold(), result.source.dimmed());
        println!("   {}", result.url.blue());
        if !result.snippet.is_empty() {
            println!("   {}", result.snippet);
        }
        if let Some(date) = &result.published_date {
            println!("   {}", date.dimmed());
        }
    }
    Ok(())
}
