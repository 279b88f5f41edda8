//! Data directory configuration.

use crate::partition::DEFAULT_PARTITION_PREFIX;
use std::path::{Path, PathBuf};

/// Where Folio keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the collection files.
    pub data_dir: PathBuf,

    /// Catalog file name, relative to `data_dir`.
    pub items_file: String,

    /// Account file name, relative to `data_dir`.
    pub accounts_file: String,

    /// Directory holding loan partitions (`None` = `data_dir`).
    pub log_dir: Option<PathBuf>,

    /// File name prefix of loan partitions.
    pub partition_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            items_file: "items.csv".to_owned(),
            accounts_file: "accounts.csv".to_owned(),
            log_dir: None,
            partition_prefix: DEFAULT_PARTITION_PREFIX.to_owned(),
        }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data directory.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the catalog file name.
    #[must_use]
    pub fn items_file(mut self, name: impl Into<String>) -> Self {
        self.items_file = name.into();
        self
    }

    /// Sets the account file name.
    #[must_use]
    pub fn accounts_file(mut self, name: impl Into<String>) -> Self {
        self.accounts_file = name.into();
        self
    }

    /// Keeps loan partitions in their own directory.
    #[must_use]
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Sets the partition file prefix.
    #[must_use]
    pub fn partition_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.partition_prefix = prefix.into();
        self
    }

    /// Path of the catalog file.
    #[must_use]
    pub fn items_path(&self) -> PathBuf {
        self.data_dir.join(&self.items_file)
    }

    /// Path of the account file.
    #[must_use]
    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(&self.accounts_file)
    }

    /// Directory holding loan partitions.
    #[must_use]
    pub fn log_dir_path(&self) -> &Path {
        self.log_dir.as_deref().unwrap_or(&self.data_dir)
    }
}
