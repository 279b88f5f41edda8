//! Data directory management.
//!
//! With the default [`Config`] the layout is:
//!
//! ```text
//! data/
//! ├─ items.csv                    # catalog items, no header
//! ├─ accounts.csv                 # account holders, no header
//! └─ transactions_<date>.csv      # loan events, one file per day
//! ```
//!
//! A [`DataDir`] builds each store once and hands out references to it, so
//! every caller in a process goes through the same in-process lock. Clones
//! share those stores. Several processes may still open the same directory and
//! rely on the per-file locking of each store.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::model::{AccountHolder, CatalogItem, LoanEvent};
use crate::partition::PartitionedLog;
use crate::store::CollectionStore;
use folio_storage::{ensure_data_dir, remove_stale_temp_files};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// An opened data directory handing out its stores.
///
/// [`catalog`](Self::catalog) and [`accounts`](Self::accounts) always return
/// the same store, and clones of a `DataDir` share it. Mutations through any
/// of them are serialized. Two `DataDir` values opened separately over the
/// same directory do not share a lock and must not mutate it concurrently.
///
/// # Example
///
/// ```rust
/// use folio_core::{Config, DataDir};
///
/// let tmp = tempfile::tempdir().unwrap();
/// let dir = DataDir::open(Config::new().data_dir(tmp.path())).unwrap();
///
/// assert!(dir.catalog().load_all().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DataDir {
    config: Config,
    catalog: Arc<CollectionStore<CatalogItem>>,
    accounts: Arc<CollectionStore<AccountHolder>>,
    loans: PartitionedLog<LoanEvent>,
}

impl DataDir {
    /// Opens the configured directories, creating them if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn open(config: Config) -> CoreResult<Self> {
        ensure_data_dir(&config.data_dir)?;
        ensure_data_dir(config.log_dir_path())?;
        Ok(Self::from_config(config))
    }

    /// Opens the configured data directory, which must already exist.
    ///
    /// Used by read-only tooling that should not create files.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataDirMissing`] if the data directory is absent.
    pub fn open_existing(config: Config) -> CoreResult<Self> {
        if !config.data_dir.is_dir() {
            return Err(CoreError::DataDirMissing {
                path: config.data_dir,
            });
        }
        Ok(Self::from_config(config))
    }

    fn from_config(config: Config) -> Self {
        let catalog = Arc::new(CollectionStore::new(config.items_path()));
        let accounts = Arc::new(CollectionStore::new(config.accounts_path()));
        let loans =
            PartitionedLog::with_prefix(config.log_dir_path(), config.partition_prefix.as_str());
        Self {
            config,
            catalog,
            accounts,
            loans,
        }
    }

    /// The configuration this directory was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.data_dir
    }

    /// Store over the catalog file.
    #[must_use]
    pub fn catalog(&self) -> &CollectionStore<CatalogItem> {
        &self.catalog
    }

    /// Store over the account file.
    #[must_use]
    pub fn accounts(&self) -> &CollectionStore<AccountHolder> {
        &self.accounts
    }

    /// The loan event log.
    #[must_use]
    pub fn loans(&self) -> &PartitionedLog<LoanEvent> {
        &self.loans
    }

    /// Removes temp files left behind by interrupted atomic writes.
    ///
    /// Returns the number of files removed.
    pub fn remove_stale_temp_files(&self) -> CoreResult<usize> {
        let mut removed = remove_stale_temp_files(self.path())?;
        let log_dir = self.config.log_dir_path();
        if log_dir != self.path() && log_dir.is_dir() {
            removed += remove_stale_temp_files(log_dir)?;
        }

        if removed > 0 {
            info!(removed, dir = %self.path().display(), "removed stale temp files");
        }
        Ok(removed)
    }
}
