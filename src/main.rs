use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use klp::{export, ingestor};
use klp_core::config::{Config, OutputFormat};

#[derive(Parser)]
#[command(name = "klp", about = "Parse container-runtime logs and unpack embedded agent records")]
struct Cli {
    /// Log files to parse, in order. Reads standard input when none (or `-`) are given.
    files: Vec<PathBuf>,

    /// Output format: text, json or logfmt.
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail on the first unparsable line or undecodable agent entry.
    #[arg(long)]
    strict: bool,

    /// Accept lines that lack a time, level or msg field.
    #[arg(long)]
    ignore_missing_fields: bool,

    /// Parse and report, but render nothing.
    #[arg(long)]
    check_only: bool,

    /// Read configuration from this file instead of ~/.config/klp/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr (RUST_LOG takes precedence).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.debug { "debug" } else { "warn" })
            }),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to default config");
            Config::defaults()
        }),
    };
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    config.parser.strict |= cli.strict;
    config.parser.ignore_missing_fields |= cli.ignore_missing_fields;

    let feeds = klp_feeds::from_args(&cli.files);
    let ingested = ingestor::ingest_feeds(feeds, ingestor::IngestOptions::from(&config.parser))?;
    let stats = ingested.stats;
    tracing::info!(
        records = stats.records,
        unpacked = stats.unpacked,
        parse_failures = stats.parse_failures,
        decode_failures = stats.decode_failures,
        "ingestion complete"
    );

    if cli.check_only {
        println!(
            "{} entries ({} agent entries unpacked), {} unparsable lines, {} undecodable agent entries",
            stats.records, stats.unpacked, stats.parse_failures, stats.decode_failures
        );
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = std::io::BufWriter::new(file);
            export::render(&ingested.entries, &config.output, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            export::render(&ingested.entries, &config.output, &mut out)?;
        }
    }

    tracing::debug!(
        entries = ingested.entries.len(),
        format = %config.output.format,
        "rendered output"
    );
    Ok(())
}
