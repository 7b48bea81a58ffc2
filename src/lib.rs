//! crst - Personal knowledge capture
//!
//! Append-only CSV store for questions, answers, and thoughts, with zip
//! backups and optional AI collaborators (Ollama for enrichment and
//! suggestions, SearxNG for related links).

pub mod ai;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod retry;
pub mod search;

pub use config::Config;
pub use core::backup::{BackupInfo, BackupService};
pub use core::entry::{Answer, Question, Thought};
pub use core::storage::Storage;
pub use error::{Error, Result};
