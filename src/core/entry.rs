//! Entry models and shared field conventions
//!
//! Timestamps are UTC, serialized second-precision without a zone suffix.
//! Content must be non-empty after trimming; everything else about it is
//! the author's business.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Wire format for entry timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A captured question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub content: String,
    pub session_uuid: Option<Uuid>,
}

/// A captured answer, optionally linked to a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub question_uuid: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub content: String,
    pub session_uuid: Option<Uuid>,
}

/// A captured thought with tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thought {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub content: String,
    pub session_uuid: Option<Uuid>,
    pub tags: Vec<String>,
}

/// Reject content that is empty or only whitespace.
pub fn validate_content(content: &str, kind: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::Validation(format!("{kind} content cannot be empty")));
    }
    Ok(())
}

/// Format a timestamp for storage.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp back into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::Storage(format!("invalid timestamp '{value}': {e}")))
}
