//! Error types for Folio core.

use folio_codec::CodecError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Folio core operations.
///
/// Absence of a record is not an error: lookups return `Option` and loads
/// return an empty `Vec`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage primitive error.
    #[error("storage error: {0}")]
    Storage(#[from] folio_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record with the same identity is already stored.
    #[error("{kind} with id {id:?} already exists")]
    DuplicateId {
        /// Record kind, e.g. `catalog item`.
        kind: &'static str,
        /// The conflicting identity.
        id: String,
    },

    /// A stored record could not be decoded into its typed form.
    #[error("cannot decode record {record} of {path:?}: {source}")]
    Decode {
        /// File holding the record.
        path: PathBuf,
        /// One-based position of the record in the file.
        record: usize,
        /// The field-level failure.
        #[source]
        source: CodecError,
    },

    /// The configured data directory does not exist.
    #[error("data directory does not exist: {path:?}")]
    DataDirMissing {
        /// The missing directory.
        path: PathBuf,
    },
}

impl CoreError {
    /// Creates a duplicate identity error.
    pub fn duplicate_id(kind: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    /// Creates a decode error for the `record`-th record of `path`.
    pub fn decode(path: &Path, record: usize, source: CodecError) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            record,
            source,
        }
    }

    /// Returns true if this is an identity conflict.
    #[must_use]
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }
}
