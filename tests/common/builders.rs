//! Test builders — ergonomic constructors for `LogEntry` values.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use klp_core::agent::{AGENT_SOURCE, CONSOLE_FIELD, CONSOLE_SENTINEL, LEGACY_SOURCE};
use klp_core::LogEntry;

// ---------------------------------------------------------------------------
// LogEntryBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogEntry`] test fixtures.
///
/// # Example
///
/// ```rust
/// let entry = LogEntryBuilder::new("agent", "time=2024-01-01T00:00:00Z level=info msg=hi")
///     .provenance("guest.log", 42, 7)
///     .build();
/// ```
pub struct LogEntryBuilder {
    entry: LogEntry,
}

impl LogEntryBuilder {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entry: LogEntry {
                source: source.into(),
                message: message.into(),
                filename: "proxy.log".to_string(),
                line: 1,
                sequence: 1,
                ..Default::default()
            },
        }
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.entry.level = level.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entry.name = name.into();
        self
    }

    pub fn pid(mut self, pid: i64) -> Self {
        self.entry.pid = pid;
        self
    }

    /// Set the timestamp from an RFC 3339 string.
    pub fn time(mut self, rfc3339: &str) -> Self {
        self.entry.time = Some(chrono::DateTime::parse_from_rfc3339(rfc3339).unwrap());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entry.fields.insert(key.into(), value.into());
        self
    }

    pub fn provenance(mut self, filename: impl Into<String>, line: u64, sequence: u64) -> Self {
        self.entry.filename = filename.into();
        self.entry.line = line;
        self.entry.sequence = sequence;
        self
    }

    pub fn build(self) -> LogEntry {
        self.entry
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// An entry on the proxy's agent channel whose `msg` is an inline logfmt
/// agent record.
pub fn inline_agent_entry(payload: &str) -> LogEntry {
    LogEntryBuilder::new(AGENT_SOURCE, payload)
        .level("info")
        .name("kata-proxy")
        .pid(100)
        .build()
}

/// A runtime entry forwarding one line of guest console output.
pub fn console_entry(raw: &str) -> LogEntry {
    LogEntryBuilder::new(LEGACY_SOURCE, CONSOLE_SENTINEL)
        .level("debug")
        .name("kata-runtime")
        .pid(200)
        .time("2024-01-15T10:00:02Z")
        .field(CONSOLE_FIELD, raw)
        .build()
}

/// A plain entry that carries no agent record.
pub fn plain_entry(source: &str, message: &str) -> LogEntry {
    LogEntryBuilder::new(source, message).level("info").build()
}
