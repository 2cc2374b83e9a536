//! Normalizer — maps tokenized logfmt lines onto [`LogEntry`] values.
//!
//! The well-known keys `time`, `level`, `msg`, `source`, `name` and `pid` are
//! lifted into the entry's core fields. Everything else lands in
//! [`LogEntry::fields`] verbatim.

use std::collections::HashSet;

use chrono::DateTime;

use crate::error::NormalizeError;
use crate::logfmt::{self, Pair};
use crate::types::LogEntry;

/// Keys every record must carry unless
/// [`NormalizeOptions::ignore_missing_fields`] is set.
pub const REQUIRED_FIELDS: &[&str] = &["time", "level", "msg"];

/// Knobs for the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Accept records that lack one of [`REQUIRED_FIELDS`].
    pub ignore_missing_fields: bool,
}

/// Build a [`LogEntry`] from the pairs of one record found at `file:line`.
///
/// `sequence` is left at zero; assigning it is the ingestor's job.
pub fn entry_from_pairs(
    pairs: Vec<Pair>,
    file: &str,
    line: u64,
    opts: NormalizeOptions,
) -> Result<LogEntry, NormalizeError> {
    let mut entry = LogEntry {
        filename: file.to_string(),
        line,
        ..Default::default()
    };
    let mut seen: HashSet<String> = HashSet::with_capacity(pairs.len());

    for (key, value) in pairs {
        if !seen.insert(key.clone()) {
            return Err(NormalizeError::DuplicateKey {
                file: file.to_string(),
                line,
                key,
            });
        }

        match key.as_str() {
            "time" => {
                let time = DateTime::parse_from_rfc3339(&value).map_err(|source| {
                    NormalizeError::InvalidTime {
                        file: file.to_string(),
                        line,
                        value: value.clone(),
                        source,
                    }
                })?;
                entry.time = Some(time);
            }
            "level" => entry.level = value.to_lowercase(),
            "msg" => entry.message = value,
            "source" => entry.source = value,
            "name" => entry.name = value,
            "pid" => {
                entry.pid = value.parse::<i64>().map_err(|_| NormalizeError::InvalidPid {
                    file: file.to_string(),
                    line,
                    value: value.clone(),
                })?;
            }
            _ => {
                entry.fields.insert(key, value);
            }
        }
    }

    if !opts.ignore_missing_fields {
        if let Some(&key) = REQUIRED_FIELDS.iter().find(|key| !seen.contains(**key)) {
            return Err(NormalizeError::MissingField {
                file: file.to_string(),
                line,
                key,
            });
        }
    }

    Ok(entry)
}

/// Tokenize and normalise a single line.
pub fn parse_line(
    text: &str,
    file: &str,
    line: u64,
    opts: NormalizeOptions,
) -> Result<LogEntry, NormalizeError> {
    let pairs = logfmt::parse_line(text).map_err(|source| NormalizeError::Syntax {
        file: file.to_string(),
        line,
        source,
    })?;
    entry_from_pairs(pairs, file, line, opts)
}

/// Normalise every non-blank line of `buffer`. The first bad line fails the
/// whole buffer.
pub fn parse_str(
    buffer: &str,
    file: &str,
    opts: NormalizeOptions,
) -> Result<Vec<LogEntry>, NormalizeError> {
    logfmt::records(buffer)
        .map(|(line, pairs)| {
            let pairs = pairs.map_err(|source| NormalizeError::Syntax {
                file: file.to_string(),
                line,
                source,
            })?;
            entry_from_pairs(pairs, file, line, opts)
        })
        .collect()
}
