//! File feed — reads a log file from disk.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::Feed;

/// A log file named on the command line.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
    name: String,
}

impl FileFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Feed for FileFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_to_string(&mut self) -> anyhow::Result<String> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("failed to read log file {}", self.name))?;
        tracing::debug!(file = %self.name, bytes = bytes.len(), "read log file");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
