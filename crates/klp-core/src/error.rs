//! Error types for the parsing layers.
//!
//! Each layer owns one enum: [`LogfmtError`] for the tokenizer,
//! [`NormalizeError`] for mapping tokens onto a [`LogEntry`](crate::LogEntry)
//! and [`AgentError`] for unpacking embedded agent records. Every error is
//! scoped to a single record.

/// Syntax errors raised while tokenizing one logfmt line. Columns are
/// 1-based character offsets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogfmtError {
    #[error("missing key before '=' at column {column}")]
    MissingKey { column: usize },

    #[error("unexpected '\"' at column {column}")]
    UnexpectedQuote { column: usize },

    #[error("unterminated quoted value starting at column {column}")]
    UnterminatedQuote { column: usize },

    #[error("invalid escape sequence at column {column}")]
    InvalidEscape { column: usize },
}

/// Errors raised while turning a tokenized line into a [`LogEntry`](crate::LogEntry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("{file}:{line}: {source}")]
    Syntax {
        file: String,
        line: u64,
        source: LogfmtError,
    },

    #[error("{file}:{line}: duplicate key {key:?}")]
    DuplicateKey { file: String, line: u64, key: String },

    #[error("{file}:{line}: invalid time {value:?}")]
    InvalidTime {
        file: String,
        line: u64,
        value: String,
        source: chrono::ParseError,
    },

    #[error("{file}:{line}: invalid pid {value:?}")]
    InvalidPid {
        file: String,
        line: u64,
        value: String,
    },

    #[error("{file}:{line}: missing required field {key:?}")]
    MissingField {
        file: String,
        line: u64,
        key: &'static str,
    },
}

/// Why an inline logfmt agent payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadDefect {
    #[error("message is empty")]
    Empty,

    #[error("expected 1 record, got {0}")]
    RecordCount(usize),

    #[error("payload is not valid logfmt")]
    Unparsable(#[source] NormalizeError),
}

/// Errors raised while unpacking an embedded agent record. None of them
/// abort a scan; the caller decides whether to skip or stop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The inline logfmt payload is empty, unparsable, or does not hold
    /// exactly one record.
    #[error("malformed agent payload at {file}:{line}: {defect}")]
    MalformedPayload {
        file: String,
        line: u64,
        #[source]
        defect: PayloadDefect,
    },

    /// An inline logfmt candidate has no file name or no line number.
    #[error("agent entry has no provenance (file {file:?}, line {line})")]
    MissingProvenance { file: String, line: u64 },

    /// A console JSON payload parsed, but its `pid` is not an integer.
    #[error("console payload at {file}:{line} has non-integer pid {pid:?}")]
    StructuralMismatch { file: String, line: u64, pid: String },

    /// The entry does not carry an agent record at all.
    #[error("agent log entry not found (source: {source_tag:?}, msg: {message:?})")]
    NotEncoded { source_tag: String, message: String },
}
