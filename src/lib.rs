//! klp — log parser for container-runtime proxy, agent and console logs.
//!
//! The proxy, the runtime and the guest console all write into the same
//! logfmt stream, but guest agent records only ever arrive nested inside
//! another subsystem's record. This crate reads the stream, re-homes those
//! agent records as first-class entries, and renders the result.
//!
//! # Architecture
//!
//! ```text
//! Feeds ──► Ingestor (normalizer + agent unpacking) ──► Export
//! ```
//!
//! Parsing lives in `klp-core`, input sources in `klp-feeds`; this crate
//! wires them together.

pub mod export;
pub mod ingestor;

pub use klp_core::{AgentError, EncodingKind, LogEntry};
