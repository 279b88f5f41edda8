//! # Folio Core
//!
//! Record stores for Folio, backed by flat CSV files.
//!
//! This crate provides:
//! - [`CollectionStore`]: whole-file stores for catalog items and account
//!   holders, with unique ids and atomic replacement on every mutation
//! - [`PartitionedLog`]: an append-only loan log with one file per day and
//!   appends serialized by an OS advisory lock
//! - [`DataDir`] and [`Config`]: the on-disk layout
//!
//! Reads are best effort (a missing or unreadable file reads as empty and is
//! logged) with `try_*` variants that report the failure. Writes always
//! return their errors.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use folio_core::{CatalogItem, Config, DataDir, LoanEvent};
//!
//! let tmp = tempfile::tempdir().unwrap();
//! let dir = DataDir::open(Config::new().data_dir(tmp.path())).unwrap();
//!
//! let catalog = dir.catalog();
//! catalog.add(CatalogItem::new("b1", "Dune", "Herbert", "sci-fi", 2, 2)).unwrap();
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! dir.loans().append(&LoanEvent::issue("t1", "b1", "m1", day, due), day).unwrap();
//!
//! assert_eq!(dir.loans().load_for_date(day).len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dir;
mod error;
mod model;
mod partition;
mod record;
mod store;

pub use config::Config;
pub use dir::DataDir;
pub use error::{CoreError, CoreResult};
pub use model::{AccountHolder, CatalogItem, Credential, LoanAction, LoanEvent, UnknownAction};
pub use partition::{PartitionScan, PartitionedLog, DEFAULT_PARTITION_PREFIX};
pub use record::{LogRecord, Record};
pub use store::CollectionStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
