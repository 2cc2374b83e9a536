//! Core types for klp-core.
//!
//! This module defines the canonical record every log line is normalised
//! into: the [`LogEntry`]. Records produced by the proxy, by the guest agent
//! and by console passthrough all share this one schema.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A normalised log entry.
///
/// The core fields (`source`, `message`, `level`, `name`, `pid`, `time`) are
/// lifted out of the parsed line; every other key lands in `fields`. The
/// provenance fields (`filename`, `line`, `sequence`) describe where in the
/// overall scan the entry was found and are never derived from its payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Subsystem that produced the entry (`proxy`, `agent`, `vmconsole`, …).
    pub source: String,
    /// Free-text log message.
    pub message: String,
    /// Severity, always lower-cased.
    pub level: String,
    /// Logical component or module name reported by the source.
    pub name: String,
    /// Process id. Zero means "not reported".
    pub pid: i64,
    /// Timestamp carried by the line itself, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<FixedOffset>>,
    /// Every non-core attribute, including nested raw payloads such as
    /// `vmconsole`.
    pub fields: BTreeMap<String, String>,
    /// File the entry was read from.
    pub filename: String,
    /// 1-based line number within `filename`.
    pub line: u64,
    /// Global counter assigned by the ingestor.
    pub sequence: u64,
}

impl LogEntry {
    /// Look up a non-core field, treating a missing key as the empty string.
    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// Copy the provenance fields (`filename`, `line`, `sequence`) from
    /// `outer` onto `self`.
    pub fn inherit_provenance(&mut self, outer: &LogEntry) {
        self.filename.clone_from(&outer.filename);
        self.line = outer.line;
        self.sequence = outer.sequence;
    }
}
