//! Ingestor — turns feeds into a single ordered stream of [`LogEntry`] values.
//!
//! Every non-blank line is normalised, stamped with the next global sequence
//! number, and, when it carries an embedded agent record, replaced in place
//! by the decoded record. Entries are never reordered.
//!
//! Bad lines and undecodable agent entries are logged and counted; with
//! [`IngestOptions::strict`] the first one aborts ingestion instead.

use anyhow::Context;
use klp_core::config::ParserConfig;
use klp_core::normalizer::{self, NormalizeOptions};
use klp_core::{agent, logfmt, AgentError, LogEntry, NormalizeError};
use klp_feeds::Feed;

/// Knobs for the ingestor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Stop at the first bad line or undecodable agent entry.
    pub strict: bool,
    pub normalize: NormalizeOptions,
}

impl From<&ParserConfig> for IngestOptions {
    fn from(config: &ParserConfig) -> Self {
        Self {
            strict: config.strict,
            normalize: config.normalize_options(),
        }
    }
}

/// Counters collected over one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Entries kept in the output stream.
    pub records: u64,
    /// Entries replaced by their embedded agent record.
    pub unpacked: u64,
    /// Lines dropped because they could not be normalised.
    pub parse_failures: u64,
    /// Agent entries kept in their outer form because decoding failed.
    pub decode_failures: u64,
}

/// The result of an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub entries: Vec<LogEntry>,
    pub stats: IngestStats,
}

/// Replace `entry` with its embedded agent record, if it has one.
///
/// Returns `Ok(true)` when the entry was replaced and `Ok(false)` when it is
/// not an agent entry. On error `entry` is left exactly as it was.
pub fn unpack_in_place(entry: &mut LogEntry) -> Result<bool, AgentError> {
    if !agent::is_agent_entry(entry) {
        return Ok(false);
    }
    *entry = agent::unpack(entry)?;
    Ok(true)
}

/// Accumulates entries from one or more feeds, keeping a single sequence
/// counter across all of them.
#[derive(Debug)]
pub struct Ingestor {
    opts: IngestOptions,
    next_sequence: u64,
    ingested: Ingested,
}

impl Ingestor {
    pub fn new(opts: IngestOptions) -> Self {
        Self {
            opts,
            next_sequence: 1,
            ingested: Ingested::default(),
        }
    }

    /// Read a feed to the end and ingest its contents.
    pub fn ingest_feed(&mut self, feed: &mut dyn Feed) -> anyhow::Result<()> {
        let buffer = feed.read_to_string()?;
        let name = feed.name().to_string();
        self.ingest_str(&name, &buffer)
    }

    /// Ingest an in-memory buffer read from `name`.
    pub fn ingest_str(&mut self, name: &str, buffer: &str) -> anyhow::Result<()> {
        for (line, pairs) in logfmt::records(buffer) {
            let parsed = pairs
                .map_err(|source| NormalizeError::Syntax {
                    file: name.to_string(),
                    line,
                    source,
                })
                .and_then(|pairs| {
                    normalizer::entry_from_pairs(pairs, name, line, self.opts.normalize)
                });

            let mut entry = match parsed {
                Ok(entry) => entry,
                Err(err) if self.opts.strict => {
                    return Err(err).context("failed to parse log entry");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unparsable log line");
                    self.ingested.stats.parse_failures += 1;
                    continue;
                }
            };

            entry.sequence = self.next_sequence;
            self.next_sequence += 1;

            match unpack_in_place(&mut entry) {
                Ok(true) => self.ingested.stats.unpacked += 1,
                Ok(false) => {}
                Err(err) if self.opts.strict => {
                    return Err(err).context("failed to unpack agent log entry");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "keeping agent entry undecoded");
                    self.ingested.stats.decode_failures += 1;
                }
            }

            self.ingested.stats.records += 1;
            self.ingested.entries.push(entry);
        }

        tracing::debug!(feed = name, stats = ?self.ingested.stats, "ingested feed");
        Ok(())
    }

    pub fn finish(self) -> Ingested {
        self.ingested
    }
}

/// Ingest every feed in order.
pub fn ingest_feeds(
    feeds: impl IntoIterator<Item = Box<dyn Feed>>,
    opts: IngestOptions,
) -> anyhow::Result<Ingested> {
    let mut ingestor = Ingestor::new(opts);
    for mut feed in feeds {
        ingestor.ingest_feed(feed.as_mut())?;
    }
    Ok(ingestor.finish())
}
