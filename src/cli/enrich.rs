//! `crst enrich` command
//!
//! Runs AI tag extraction (and optionally a web search) for a stored
//! thought, then persists the generated tags.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::ai::EnrichmentService;
use crate::cli::utils::parse_uuid;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// UUID of the thought to enrich
    pub thought_uuid: String,

    /// Skip the related-links web search
    #[arg(long)]
    pub no_search: bool,
}

pub async fn run(args: EnrichArgs, config: &Config) -> Result<()> {
    let id = parse_uuid(&args.thought_uuid, "thought")?;
    let service = EnrichmentService::new(config)?;

    let enrichment = service.enrich_thought(id, !args.no_search).await?;

    if enrichment.generated_tags.is_empty() {
        println!("No tags generated.");
    } else {
        println!("🏷️  Tags: {}", enrichment.generated_tags.join(", ").green());
    }

    if !enrichment.search_results.is_empty() {
        println!("\n🔗 Related:");
        for result in &enrichment.search_results {
            println!("  {} ({})", result.title.bold(), result.source.dimmed());
            println!("    {}", result.url.blue());
        }
    }
    Ok(())
}
