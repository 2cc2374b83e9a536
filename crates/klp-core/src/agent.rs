//! Agent unpacking — recovers guest agent records nested inside proxy or
//! runtime records.
//!
//! The guest agent never writes to the log files itself. Its records reach
//! them wrapped inside another subsystem's record, in one of two encodings:
//!
//! - **Inline logfmt** (older agents): the outer `msg` is a complete logfmt
//!   line of its own, e.g. `msg="time=… level=info msg=\"hello\""`.
//! - **Console JSON** (newer agents): the outer `msg` is the fixed sentinel
//!   `reading guest console` and the agent record sits in the `vmconsole`
//!   field as a JSON object. Console lines that are not JSON are plain guest
//!   console output.
//!
//! [`classify`] is the single place that decides which encoding applies;
//! [`is_agent_entry`] and [`unpack`] are both defined in terms of it.
//!
//! # Provenance and ordering
//!
//! A decoded entry always takes `filename`, `line` and `sequence` from the
//! outer entry. Ordering authority is always the outer entry: the agent's own
//! timestamp is never adopted, because guest-side records reach the host
//! about a second late and would sort out of place against host-side lines.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AgentError, PayloadDefect};
use crate::normalizer::{self, NormalizeOptions};
use crate::types::LogEntry;

/// Source tag of the proxy's agent channel, and the tag every inline
/// logfmt record is re-homed under.
pub const AGENT_SOURCE: &str = "agent";

/// Source tag of the legacy runtime transport.
pub const LEGACY_SOURCE: &str = "virtcontainers";

/// `msg` used by the transport when forwarding raw guest console output.
pub const CONSOLE_SENTINEL: &str = "reading guest console";

/// Field holding the raw console line.
pub const CONSOLE_FIELD: &str = "vmconsole";

/// Source tag given to console lines that are not JSON.
pub const CONSOLE_SOURCE: &str = "vmconsole";

const INLINE_PREFIX: &str = "time=";

/// How an entry's payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    /// A plain entry; pass it through untouched.
    None,
    /// The `msg` is itself a logfmt agent record.
    InlineLogfmt,
    /// The `vmconsole` field carries console output, usually agent JSON.
    ConsoleJson,
}

/// Decide whether `entry` carries an embedded agent record, and how.
pub fn classify(entry: &LogEntry) -> EncodingKind {
    if entry.source != AGENT_SOURCE && entry.source != LEGACY_SOURCE {
        return EncodingKind::None;
    }

    if entry.message == CONSOLE_SENTINEL {
        if entry.field(CONSOLE_FIELD).is_empty() {
            EncodingKind::None
        } else {
            EncodingKind::ConsoleJson
        }
    } else if entry.message.starts_with(INLINE_PREFIX) {
        EncodingKind::InlineLogfmt
    } else {
        EncodingKind::None
    }
}

/// Returns true if `entry` actually contains an encoded agent record.
pub fn is_agent_entry(entry: &LogEntry) -> bool {
    classify(entry) != EncodingKind::None
}

/// Decode the agent record embedded in `entry`.
///
/// The returned entry is meant to replace `entry` in the stream. Calling
/// this on an entry [`is_agent_entry`] rejects is a caller bug and yields
/// [`AgentError::NotEncoded`].
pub fn unpack(entry: &LogEntry) -> Result<LogEntry, AgentError> {
    // Routing follows `classify`, not the source tag alone: an `agent` entry
    // is not forced through the logfmt decoder, and a `virtcontainers` entry
    // with a `time=` message decodes as inline logfmt instead of being
    // treated as console output.
    match classify(entry) {
        EncodingKind::InlineLogfmt => decode_inline_logfmt(entry),
        EncodingKind::ConsoleJson => decode_console_json(entry),
        EncodingKind::None => Err(AgentError::NotEncoded {
            source_tag: entry.source.clone(),
            message: entry.message.clone(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Inline logfmt
// ---------------------------------------------------------------------------

/// Decode an entry whose `msg` is a single logfmt agent record.
///
/// The inner record's fields win, except `source` (always [`AGENT_SOURCE`])
/// and the provenance fields (always the outer entry's).
pub fn decode_inline_logfmt(entry: &LogEntry) -> Result<LogEntry, AgentError> {
    let malformed = |defect| AgentError::MalformedPayload {
        file: entry.filename.clone(),
        line: entry.line,
        defect,
    };

    if entry.message.is_empty() {
        return Err(malformed(PayloadDefect::Empty));
    }
    if entry.filename.is_empty() || entry.line == 0 {
        return Err(AgentError::MissingProvenance {
            file: entry.filename.clone(),
            line: entry.line,
        });
    }

    let mut records =
        normalizer::parse_str(&entry.message, &entry.filename, NormalizeOptions::default())
            .map_err(|err| malformed(PayloadDefect::Unparsable(err)))?;
    if records.len() != 1 {
        return Err(malformed(PayloadDefect::RecordCount(records.len())));
    }

    let mut agent = records.remove(0);
    agent.source = AGENT_SOURCE.to_string();
    agent.inherit_provenance(entry);
    Ok(agent)
}

// ---------------------------------------------------------------------------
// Console JSON
// ---------------------------------------------------------------------------

/// The agent keys understood inside a console JSON payload. Any other key
/// (including the agent's own `time`) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsolePayload {
    pub pid: Option<String>,
    pub level: Option<String>,
    pub msg: Option<String>,
    pub source: Option<String>,
    pub name: Option<String>,
}

/// A console line, split on whether it held an agent JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    Structured(ConsolePayload),
    /// Raw console text, kept verbatim.
    Unstructured(String),
}

impl ConsoleLine {
    /// Only a JSON object whose known keys are all strings counts as
    /// structured.
    ///
    /// A bare `null` is console text too; it carries no payload and so no
    /// pid to report a mismatch against.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value)
                .map(ConsoleLine::Structured)
                .unwrap_or_else(|_| ConsoleLine::Unstructured(raw.to_string())),
            _ => ConsoleLine::Unstructured(raw.to_string()),
        }
    }
}

/// Decode an entry whose `vmconsole` field holds guest console output.
///
/// Console text that is not an agent JSON object is not an error: it becomes
/// the entry's message under the [`CONSOLE_SOURCE`] tag. A JSON object whose
/// `pid` is missing or not an integer is a [`AgentError::StructuralMismatch`].
pub fn decode_console_json(entry: &LogEntry) -> Result<LogEntry, AgentError> {
    let raw = entry.field(CONSOLE_FIELD);
    // The copy keeps the outer time, provenance and fields (including the raw
    // JSON under `vmconsole`).
    let mut agent = entry.clone();

    let payload = match ConsoleLine::parse(raw) {
        ConsoleLine::Structured(payload) => payload,
        ConsoleLine::Unstructured(text) => {
            tracing::debug!(
                file = %entry.filename,
                line = entry.line,
                "console line is not agent JSON, keeping it as text"
            );
            agent.message = text;
            agent.source = CONSOLE_SOURCE.to_string();
            return Ok(agent);
        }
    };

    let pid_text = payload.pid.unwrap_or_default();
    let pid = pid_text
        .parse::<i64>()
        .map_err(|_| AgentError::StructuralMismatch {
            file: entry.filename.clone(),
            line: entry.line,
            pid: pid_text.clone(),
        })?;

    agent.level = payload.level.unwrap_or_default().to_lowercase();
    agent.message = payload.msg.unwrap_or_default();
    agent.source = payload.source.unwrap_or_default();
    agent.name = payload.name.unwrap_or_default();
    agent.pid = pid;
    Ok(agent)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
