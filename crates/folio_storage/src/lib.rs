//! # Folio Storage
//!
//! Crash-safe file primitives used by every Folio store.
//!
//! This crate knows nothing about records or the line format. It offers two
//! ways of changing a file:
//!
//! - **Atomic replace** ([`write_atomically`]): the new content goes to a
//!   temporary file in the same directory, is synced, and is renamed over the
//!   target. Readers see either the old or the new content, never a mix and
//!   never a missing file.
//! - **Locked append** ([`append_line_with_lock`], [`AppendLock`]): the file is
//!   opened for append under an OS advisory exclusive lock, so cooperating
//!   threads and processes serialize on each line they write.
//!
//! ## Example
//!
//! ```rust
//! use folio_storage::{append_line_with_lock, write_atomically};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("items.csv");
//!
//! write_atomically(&path, "b1,Dune\n").unwrap();
//! append_line_with_lock(&path, "b2,Emma").unwrap();
//!
//! let content = std::fs::read_to_string(&path).unwrap();
//! assert!(content.starts_with("b1,Dune"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod append;
mod atomic;
mod error;

pub use append::{append_line_with_lock, AppendLock};
pub use atomic::{
    ensure_data_dir, is_temp_file_name, remove_stale_temp_files, write_atomically,
    write_atomically_with, TEMP_SUFFIX,
};
pub use error::{StorageError, StorageResult};

/// Line terminator written after every record.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Line terminator written after every record.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";
