//! Core domain: entry models, CSV persistence, and backup archives.

pub mod backup;
pub mod entry;
pub mod record;
pub mod storage;
