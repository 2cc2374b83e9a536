//! Export — renders [`LogEntry`] values as text, JSON or logfmt.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Context;

use chrono::SecondsFormat;
use klp_core::config::{OutputConfig, OutputFormat};
use klp_core::logfmt::encode_value;
use klp_core::LogEntry;

/// Render `entries` to `out` in the configured format.
pub fn render<W: Write>(entries: &[LogEntry], config: &OutputConfig, out: &mut W) -> anyhow::Result<()> {
    match config.format {
        OutputFormat::Text => {
            config.validate()?;
            for entry in entries {
                writeln!(out, "{}", text_line(entry, &config.timestamp_format)?)?;
            }
        }
        OutputFormat::Logfmt => {
            for entry in entries {
                writeln!(out, "{}", logfmt_line(entry))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, entries)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// One human-readable line:
/// `<sequence> <time> <file>:<line> [<level>] <source>[/<name>][[<pid>]]: <msg> <fields…>`.
///
/// Fails if `timestamp_format` is not a format chrono can render.
pub fn text_line(entry: &LogEntry, timestamp_format: &str) -> anyhow::Result<String> {
    let mut time = String::new();
    match entry.time {
        Some(t) => write!(time, "{}", t.format(timestamp_format))
            .with_context(|| format!("cannot render timestamp with format {timestamp_format:?}"))?,
        None => time.push('-'),
    }

    let mut line = format!(
        "{} {} {}:{} [{}] {}",
        entry.sequence, time, entry.filename, entry.line, entry.level, entry.source
    );
    if !entry.name.is_empty() {
        line.push('/');
        line.push_str(&entry.name);
    }
    if entry.pid != 0 {
        line.push_str(&format!("[{}]", entry.pid));
    }
    line.push_str(": ");
    line.push_str(&entry.message);
    for (key, value) in &entry.fields {
        line.push_str(&format!(" {key}={}", encode_value(value)));
    }
    Ok(line)
}

/// Re-encode an entry as a logfmt line that the normalizer reads back into
/// the same core fields. Provenance is not emitted.
pub fn logfmt_line(entry: &LogEntry) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::with_capacity(entry.fields.len() + 6);
    if let Some(time) = entry.time {
        pairs.push(("time", time.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
    }
    pairs.push(("level", entry.level.clone()));
    if !entry.source.is_empty() {
        pairs.push(("source", entry.source.clone()));
    }
    if !entry.name.is_empty() {
        pairs.push(("name", entry.name.clone()));
    }
    if entry.pid != 0 {
        pairs.push(("pid", entry.pid.to_string()));
    }
    pairs.push(("msg", entry.message.clone()));
    for (key, value) in &entry.fields {
        pairs.push((key.as_str(), value.clone()));
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", encode_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
}
