//! klp-core — core library for the klp container-runtime log parser.
//!
//! This crate exposes the parsing layers as public modules, plus the shared
//! record type used across all of them.
//!
//! # Architecture
//!
//! ```text
//! logfmt ──► normalizer ──► agent (detect ──► decode v1 / v2)
//! ```
//!
//! Every layer is synchronous and works on already-read, in-memory buffers.
//! Reading feeds and rendering output live in the `klp` binary crate.

pub mod agent;
pub mod config;
pub mod error;
pub mod logfmt;
pub mod normalizer;
pub mod types;

pub use agent::{classify, is_agent_entry, unpack, EncodingKind};
pub use error::{AgentError, LogfmtError, NormalizeError};
pub use types::LogEntry;
