//! `crst answer` command
//!
//! Appends an answer to the store, optionally linked to a question. The
//! link is not checked against existing questions; answers may arrive
//! before the question they address is recorded.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use uuid::Uuid;

use crate::cli::utils::resolve_session;
use crate::config::Config;
use crate::core::storage::Storage;

#[derive(Args, Debug)]
pub struct AnswerArgs {
    /// Content of the answer
    pub content: String,

    /// UUID of the question this answers
    #[arg(short, long)]
    pub question_uuid: Option<String>,

    /// Session UUID to group this entry under
    #[arg(short, long)]
    pub session: Option<String>,
}

pub fn run(args: AnswerArgs, config: &Config) -> Result<()> {
    let storage = Storage::open(&config.storage_dir)?;
    let session = resolve_session(args.session.as_deref(), config)?;

    let id = Uuid::new_v4();
    storage.store_answer(
        &args.content,
        &config.username,
        Utc::now(),
        id,
        args.question_uuid.as_deref(),
        session,
    )?;

    println!("✅ Answer recorded: {id}");
    if let Some(question) = &args.question_uuid {
        println!("   Question: {question}");
    }
    Ok(())
}
