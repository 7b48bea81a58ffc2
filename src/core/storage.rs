//! Entry store - append-only CSV persistence
//!
//! Each entry kind owns one file under its own subdirectory of the data
//! root. Rows are only ever appended, except for thought tag updates which
//! rewrite the thoughts file through a temp-file-and-rename.
//!
//! # Key Points
//! - A failed store call writes nothing: the full row is built in memory,
//!   then appended and flushed in one operation.
//! - File handles are scoped per operation; nothing is held across calls.
//! - Concurrent invocations of the CLI are not coordinated; simultaneous
//!   appends from two processes are undefined.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entry::{self, Answer, Question, Thought};
use super::record;
use crate::error::{Error, Result};

const QUESTIONS_HEADER: &str = "uuid,timestamp,username,content,session_uuid";
const ANSWERS_HEADER: &str = "uuid,question_uuid,timestamp,username,content,session_uuid";
const THOUGHTS_HEADER: &str = "uuid,timestamp,username,content,session_uuid,tags";

/// CSV-backed storage for questions, answers, and thoughts.
pub struct Storage {
    questions_file: PathBuf,
    answers_file: PathBuf,
    thoughts_file: PathBuf,
}

impl Storage {
    /// Open storage rooted at `base_dir`, creating directories and headered
    /// files as needed. Re-opening an existing store never rewrites headers.
    pub fn open(base_dir: &Path) -> Result<Self> {
        let questions_dir = base_dir.join("questions");
        let answers_dir = base_dir.join("answers");
        let thoughts_dir = base_dir.join("thoughts");

        for dir in [&questions_dir, &answers_dir, &thoughts_dir] {
            fs::create_dir_all(dir)
                .map_err(|e| Error::Storage(format!("failed to create {}: {e}", dir.display())))?;
        }

        let storage = Self {
            questions_file: questions_dir.join("questions.csv"),
            answers_file: answers_dir.join("answers.csv"),
            thoughts_file: thoughts_dir.join("thoughts.csv"),
        };

        init_csv_file(&storage.questions_file, QUESTIONS_HEADER)?;
        init_csv_file(&storage.answers_file, ANSWERS_HEADER)?;
        init_csv_file(&storage.thoughts_file, THOUGHTS_HEADER)?;

        Ok(storage)
    }

    /// Append a question row.
    pub fn store_question(
        &self,
        content: &str,
        username: &str,
        timestamp: DateTime<Utc>,
        id: Uuid,
        session_uuid: Option<Uuid>,
    ) -> Result<()> {
        entry::validate_content(content, "Question")?;

        let row = record::encode_record(&[
            &id.to_string(),
            &entry::format_timestamp(&timestamp),
            username,
            content,
            &uuid_field(session_uuid),
        ]);
        append_row(&self.questions_file, &row)
            .map_err(|e| Error::Storage(format!("failed to store question: {e}")))
    }

    /// Append an answer row.
    ///
    /// `question_uuid`, when given as text, must parse as a UUID. The
    /// referenced question is not checked for existence.
    pub fn store_answer(
        &self,
        content: &str,
        username: &str,
        timestamp: DateTime<Utc>,
        id: Uuid,
        question_uuid: Option<&str>,
        session_uuid: Option<Uuid>,
    ) -> Result<()> {
        entry::validate_content(content, "Answer")?;

        let question_uuid = match question_uuid {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|e| Error::Validation(format!("invalid question UUID: {e}")))?,
            ),
            None => None,
        };

        let row = record::encode_record(&[
            &id.to_string(),
            &uuid_field(question_uuid),
            &entry::format_timestamp(&timestamp),
            username,
            content,
            &uuid_field(session_uuid),
        ]);
        append_row(&self.answers_file, &row)
            .map_err(|e| Error::Storage(format!("failed to store answer: {e}")))
    }

    /// Append a thought row. Tags are comma-joined in a single field.
    pub fn store_thought(
        &self,
        content: &str,
        username: &str,
        timestamp: DateTime<Utc>,
        id: Uuid,
        session_uuid: Option<Uuid>,
        tags: &[String],
    ) -> Result<()> {
        entry::validate_content(content, "Thought")?;

        let row = record::encode_record(&[
            &id.to_string(),
            &entry::format_timestamp(&timestamp),
            username,
            content,
            &uuid_field(session_uuid),
            &encode_tags(tags),
        ]);
        append_row(&self.thoughts_file, &row)
            .map_err(|e| Error::Storage(format!("failed to store thought: {e}")))
    }

    /// Look up a question by id. Absent is not an error.
    pub fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
        for fields in read_rows(&self.questions_file)? {
            let question = parse_question(&fields)?;
            if question.id == id {
                return Ok(Some(question));
            }
        }
        Ok(None)
    }

    /// Look up an answer by id. Absent is not an error.
    pub fn get_answer(&self, id: Uuid) -> Result<Option<Answer>> {
        for fields in read_rows(&self.answers_file)? {
            let answer = parse_answer(&fields)?;
            if answer.id == id {
                return Ok(Some(answer));
            }
        }
        Ok(None)
    }

    /// Look up a thought by id. Absent is not an error.
    pub fn get_thought(&self, id: Uuid) -> Result<Option<Thought>> {
        for fields in read_rows(&self.thoughts_file)? {
            let thought = parse_thought(&fields)?;
            if thought.id == id {
                return Ok(Some(thought));
            }
        }
        Ok(None)
    }

    /// Replace the tag list of a stored thought.
    ///
    /// Rewrites the thoughts file through a temp file and rename, since the
    /// store is otherwise append-only text.
    pub fn update_thought_tags(&self, id: Uuid, tags: &[String]) -> Result<()> {
        let rows = read_rows(&self.thoughts_file)?;
        let mut found = false;
        let mut lines = vec![THOUGHTS_HEADER.to_string()];

        for fields in rows {
            let mut thought = parse_thought(&fields)?;
            if thought.id == id {
                thought.tags = tags.to_vec();
                found = true;
            }
            lines.push(encode_thought(&thought));
        }

        if !found {
            return Err(Error::Validation(format!("thought not found: {id}")));
        }

        let tmp_path = self.thoughts_file.with_extension("csv.tmp");
        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            for line in &lines {
                file.write_all(line.as_bytes())?;
                file.write_all(b"\n")?;
            }
            file.flush()?;
            fs::rename(&tmp_path, &self.thoughts_file)
        };
        write().map_err(|e| Error::Storage(format!("failed to update thought tags: {e}")))
    }
}

/// Write the header into a CSV file that does not already exist.
fn init_csv_file(path: &Path, header: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let write = || -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(header.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()
    };
    write().map_err(|e| Error::Storage(format!("failed to initialize {}: {e}", path.display())))
}

/// Append one encoded row, full line then flush.
fn append_row(path: &Path, row: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    let mut line = String::with_capacity(row.len() + 1);
    line.push_str(row);
    line.push('\n');
    file.write_all(line.as_bytes())?;
    file.flush()
}

/// Read every data row (header skipped) as parsed fields.
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path)
        .map_err(|e| Error::Storage(format!("failed to open {}: {e}", path.display())))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line =
            line.map_err(|e| Error::Storage(format!("failed to read {}: {e}", path.display())))?;
        if index == 0 || line.is_empty() {
            continue;
        }
        rows.push(record::parse_record(&line)?);
    }
    Ok(rows)
}

fn uuid_field(value: Option<Uuid>) -> String {
    value.map(|u| u.to_string()).unwrap_or_default()
}

fn parse_uuid_field(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Storage(format!("invalid {what} '{value}': {e}")))
}

fn parse_optional_uuid(value: &str, what: &str) -> Result<Option<Uuid>> {
    if value.is_empty() {
        Ok(None)
    } else {
        parse_uuid_field(value, what).map(Some)
    }
}

fn encode_tags(tags: &[String]) -> String {
    tags.join(",")
}

fn parse_tags(field: &str) -> Vec<String> {
    field
        .split(',')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn parse_question(fields: &[String]) -> Result<Question> {
    if fields.len() != 5 {
        return Err(Error::Storage(format!(
            "malformed question row, expected 5 fields, got {}",
            fields.len()
        )));
    }
    Ok(Question {
        id: parse_uuid_field(&fields[0], "entry uuid")?,
        timestamp: entry::parse_timestamp(&fields[1])?,
        username: fields[2].clone(),
        content: fields[3].clone(),
        session_uuid: parse_optional_uuid(&fields[4], "session uuid")?,
    })
}

fn parse_answer(fields: &[String]) -> Result<Answer> {
    if fields.len() != 6 {
        return Err(Error::Storage(format!(
            "malformed answer row, expected 6 fields, got {}",
            fields.len()
        )));
    }
    Ok(Answer {
        id: parse_uuid_field(&fields[0], "entry uuid")?,
        question_uuid: parse_optional_uuid(&fields[1], "question uuid")?,
        timestamp: entry::parse_timestamp(&fields[2])?,
        username: fields[3].clone(),
        content: fields[4].clone(),
        session_uuid: parse_optional_uuid(&fields[5], "session uuid")?,
    })
}

fn parse_thought(fields: &[String]) -> Result<Thought> {
    if fields.len() != 6 {
        return Err(Error::Storage(format!(
            "malformed thought row, expected 6 fields, got {}",
            fields.len()
        )));
    }
    Ok(Thought {
        id: parse_uuid_field(&fields[0], "entry uuid")?,
        timestamp: entry::parse_timestamp(&fields[1])?,
        username: fields[2].clone(),
        content: fields[3].clone(),
        session_uuid: parse_optional_uuid(&fields[4], "session uuid")?,
        tags: parse_tags(&fields[5]),
    })
}

fn encode_thought(thought: &Thought) -> String {
    record::encode_record(&[
        &thought.id.to_string(),
        &entry::format_timestamp(&thought.timestamp),
        &thought.username,
        &thought.content,
        &uuid_field(thought.session_uuid),
        &encode_tags(&thought.tags),
    ])
}
