//! `crst question` command
//!
//! Appends a question to the store and prints its UUID.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use uuid::Uuid;

use crate::cli::utils::resolve_session;
use crate::config::Config;
use crate::core::storage::Storage;

#[derive(Args, Debug)]
pub struct QuestionArgs {
    /// Content of the question
    pub content: String,

    /// Session UUID to group this entry under
    #[arg(short, long)]
    pub session: Option<String>,
}

pub fn run(args: QuestionArgs, config: &Config) -> Result<()> {
    let storage = Storage::open(&config.storage_dir)?;
    let session = resolve_session(args.session.as_deref(), config)?;

    let id = Uuid::new_v4();
    storage.store_question(&args.content, &config.username, Utc::now(), id, session)?;

    println!("✅ Question recorded: {id}");
    Ok(())
}
