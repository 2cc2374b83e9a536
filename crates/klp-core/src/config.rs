//! Configuration types for klp.
//!
//! [`Config::load`] reads `~/.config/klp/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] reads an
//! explicit path instead. [`Config::defaults`] returns the same defaults
//! without touching the filesystem (useful in tests).

use anyhow::bail;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::normalizer::NormalizeOptions;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[parser]
strict                = false
ignore_missing_fields = false

[output]
format           = "text"
timestamp_format = "%Y-%m-%dT%H:%M:%S%.9f%:z"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/klp/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[parser]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserConfig {
    /// Abort on the first unparsable line or undecodable agent entry instead
    /// of logging it and moving on.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub ignore_missing_fields: bool,
}

impl ParserConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            ignore_missing_fields: self.ignore_missing_fields,
        }
    }
}

/// `[output]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_format() -> OutputFormat { OutputFormat::Text }
fn default_timestamp_format() -> String { "%Y-%m-%dT%H:%M:%S%.9f%:z".to_string() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl OutputConfig {
    /// Reject a `timestamp_format` that chrono cannot render.
    pub fn validate(&self) -> anyhow::Result<()> {
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid timestamp_format: {:?}", self.timestamp_format);
        }
        Ok(())
    }
}

/// How parsed entries are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per entry.
    Text,
    /// A pretty-printed JSON array.
    Json,
    /// One logfmt line per entry.
    Logfmt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Logfmt => write!(f, "logfmt"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "logfmt" => Ok(OutputFormat::Logfmt),
            other => Err(format!("unknown output format: {other} (expected text, json or logfmt)")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/klp/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit path, layered on top of the built-in defaults.
    /// The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        cfg.output.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("klp")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
