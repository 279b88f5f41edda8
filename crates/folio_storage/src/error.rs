//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The final rename of an atomic write failed.
    #[error("failed to move new content into place at {path:?}: {source}")]
    Persist {
        /// The target that was not replaced.
        path: PathBuf,
        /// The underlying rename error.
        #[source]
        source: io::Error,
    },

    /// The advisory lock on a file could not be taken.
    #[error("failed to lock {path:?}: {source}")]
    Lock {
        /// The file that could not be locked.
        path: PathBuf,
        /// The underlying locking error.
        #[source]
        source: io::Error,
    },
}
