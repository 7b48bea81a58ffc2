//! `crst thought` command
//!
//! Appends a thought to the store, with optional tags.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use uuid::Uuid;

use crate::cli::utils::resolve_session;
use crate::config::Config;
use crate::core::storage::Storage;

#[derive(Args, Debug)]
pub struct ThoughtArgs {
    /// Content of the thought
    pub content: String,

    /// Tags for the thought (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Session UUID to group this entry under
    #[arg(short, long)]
    pub session: Option<String>,
}

pub fn run(args: ThoughtArgs, config: &Config) -> Result<()> {
    let storage = Storage::open(&config.storage_dir)?;
    let session = resolve_session(args.session.as_deref(), config)?;

    let id = Uuid::new_v4();
    let tags = args.tags.unwrap_or_default();
    storage.store_thought(&args.content, &config.username, Utc::now(), id, session, &tags)?;

    println!("✅ Thought recorded: {id}");
    if !tags.is_empty() {
        println!("   Tags: {}", tags.join(", "));
    }
    Ok(())
}
