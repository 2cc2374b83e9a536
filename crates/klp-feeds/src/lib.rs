//! klp-feeds — log feed sources for klp.
//!
//! Each feed names where its bytes come from and hands back the whole buffer
//! as UTF-8 text. The ingestor in the `klp` crate tokenizes and normalises
//! it; feeds never look inside a line.

pub mod file;
pub mod stdin;

pub use file::FileFeed;
pub use stdin::StdinFeed;

/// Trait implemented by each log feed source.
pub trait Feed {
    /// Name recorded as the `filename` of every entry read from this feed.
    fn name(&self) -> &str;

    /// Read the feed to the end. Invalid UTF-8 is replaced, not rejected.
    fn read_to_string(&mut self) -> anyhow::Result<String>;
}

/// Build the feeds for a list of command-line paths. No paths, or a lone
/// `-`, mean standard input.
pub fn from_args<P: AsRef<std::path::Path>>(paths: &[P]) -> Vec<Box<dyn Feed>> {
    if paths.is_empty() {
        return vec![Box::new(StdinFeed::new())];
    }
    paths
        .iter()
        .map(|path| -> Box<dyn Feed> {
            let path = path.as_ref();
            if path.as_os_str() == "-" {
                Box::new(StdinFeed::new())
            } else {
                Box::new(FileFeed::new(path))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_paths_means_stdin() {
        let feeds = from_args::<&str>(&[]);
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].name(), stdin::STDIN_NAME);
    }

    #[test]
    fn dash_means_stdin_and_paths_keep_order() {
        let feeds = from_args(&["a.log", "-", "b.log"]);
        let names: Vec<&str> = feeds.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.log", stdin::STDIN_NAME, "b.log"]);
    }
}
