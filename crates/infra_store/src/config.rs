//! Record store configuration

use std::path::{Path, PathBuf};

/// Configuration options for the record store
///
/// # Example
///
/// ```rust
/// use infra_store::StoreConfig;
///
/// let config = StoreConfig::new("./data").flush_on_write(false);
/// assert!(!config.flush_on_write);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one `<collection>.json` file per collection;
    /// `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// Write a collection to disk as soon as it is saved, instead of on
    /// `flush`/`close`
    pub flush_on_write: bool,
}

impl StoreConfig {
    /// Creates a file-backed configuration rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            flush_on_write: true,
        }
    }

    /// Creates a configuration that never touches the file system
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            flush_on_write: false,
        }
    }

    pub fn flush_on_write(mut self, flush: bool) -> Self {
        self.flush_on_write = flush;
        self
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.data_dir.is_some()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("data")
    }
}
