//! `crst suggest` commands
//!
//! AI-drafted answers and follow-up questions. Suggestions are printed
//! only; recording them is a separate, deliberate step.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::ai::SuggestionService;
use crate::cli::utils::parse_uuid;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    #[command(subcommand)]
    pub command: SuggestCommands,
}

#[derive(Subcommand, Debug)]
pub enum SuggestCommands {
    /// Draft an answer for a stored question
    Answer {
        /// UUID of the question
        question_uuid: String,
    },

    /// Generate follow-up questions for a topic
    Questions {
        /// Topic or question to expand on
        content: String,
    },
}

pub async fn run(args: SuggestArgs, config: &Config) -> Result<()> {
    let service = SuggestionService::new(config)?;

    match args.command {
        SuggestCommands::Answer { question_uuid } => {
            let id = parse_uuid(&question_uuid, "question")?;
            let answer = service.suggest_answer(id).await?;
            println!("💡 Suggested answer:\n");
            println!("{answer}");
            println!(
                "\n{}",
                "Record it with: crst answer <content> --question-uuid <uuid>".dimmed()
            );
        }
        SuggestCommands::Questions { content } => {
            let questions = service.suggest_questions(&content).await?;
            if questions.is_empty() {
                println!("No suggestions generated.");
                return Ok(());
            }
            println!("💡 Suggested questions:\n");
            for question in &questions {
                println!("  {question}");
            }
        }
    }
    Ok(())
}
