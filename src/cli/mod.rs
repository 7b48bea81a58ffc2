//! CLI module - Command definitions and handlers

use clap::{Parser, Subcommand};

pub mod answer;
pub mod backup;
pub mod enrich;
pub mod question;
pub mod search;
pub mod suggest;
pub mod thought;
pub mod utils;

/// crst - Personal knowledge capture CLI
///
/// Append-only store for questions, answers, and thoughts, with zip backups
/// and optional AI enrichment.
#[derive(Parser, Debug)]
#[command(name = "crst")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a question
    Question(question::QuestionArgs),

    /// Record an answer
    Answer(answer::AnswerArgs),

    /// Record a thought
    Thought(thought::ThoughtArgs),

    /// Create, list, or restore backups
    Backup(backup::BackupArgs),

    /// Enrich a thought with AI-generated tags and related links
    Enrich(enrich::EnrichArgs),

    /// Generate AI suggestions
    Suggest(suggest::SuggestArgs),

    /// Search the web via the configured SearxNG instance
    Search(search::SearchArgs),
}
