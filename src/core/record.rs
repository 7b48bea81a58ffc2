//! CSV record codec
//!
//! One record per line. Fields containing a comma or a double quote are
//! quoted, with internal quotes doubled. Newlines inside a field are
//! flattened to a single space before encoding, so a record never spans
//! lines; that flattening is deliberately lossy.

use crate::error::{Error, Result};

/// Encode one field, flattening newlines and quoting when needed.
pub fn encode_field(value: &str) -> String {
    let flat = value.replace("\r\n", " ").replace(['\n', '\r'], " ");
    if flat.contains(',') || flat.contains('"') {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

/// Encode a full record as one comma-separated line.
pub fn encode_record(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| encode_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse one encoded line back into its fields.
pub fn parse_record(line: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                // A quote only opens a quoted field at the field start.
                '"' if current.is_empty() => in_quotes = true,
                ',' => {
                    fields.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
    }

    if in_quotes {
        return Err(Error::Storage(format!(
            "unterminated quoted field in record: {line}"
        )));
    }

    fields.push(current);
    Ok(fields)
}
