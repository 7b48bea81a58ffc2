//! Error taxonomy shared across the crate.
//!
//! Core modules return these typed errors; the CLI boundary converts them
//! into an exit code and a message on stderr via `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad input: empty content, malformed UUID, missing target entry.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O failure while reading or writing entry files.
    #[error("storage error: {0}")]
    Storage(String),

    /// Archive create/restore/list failure, including duplicate names
    /// and invalid metadata.
    #[error("backup error: {0}")]
    Backup(String),

    /// Unreadable or unparsable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// AI completion service failure.
    #[error("AI error: {0}")]
    Ai(String),

    /// Web search service failure.
    #[error("search error: {0}")]
    Search(String),
}

pub type Result<T> = std::result::Result<T, Error>;
