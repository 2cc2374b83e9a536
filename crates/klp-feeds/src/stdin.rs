//! Stdin feed — reads piped log data.

use std::io::Read;

use anyhow::Context;

use crate::Feed;

/// Name recorded as the `filename` of entries read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Default)]
pub struct StdinFeed;

impl StdinFeed {
    pub fn new() -> Self {
        Self
    }
}

impl Feed for StdinFeed {
    fn name(&self) -> &str {
        STDIN_NAME
    }

    fn read_to_string(&mut self) -> anyhow::Result<String> {
        let mut bytes = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("failed to read standard input")?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
