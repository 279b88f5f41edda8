//! Appends serialized by an OS advisory lock.
//!
//! An [`AppendLock`] holds an exclusive `fs2` lock on the target file for as
//! long as it lives. Other threads or processes taking the same lock on the
//! same file block until it is dropped, so each line lands whole.
//!
//! A crash in the middle of a write can still leave a torn last line. Callers
//! that care (the partition log does) inspect the tail while holding the lock
//! and repair it before appending.

use crate::error::{StorageError, StorageResult};
use crate::LINE_SEPARATOR;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Exclusive advisory lock on a file opened for appending.
///
/// The lock is released when the value is dropped, including on early
/// returns and panics.
#[derive(Debug)]
pub struct AppendLock {
    path: PathBuf,
    file: File,
}

impl AppendLock {
    /// Opens (creating if needed) `path` for appending and blocks until the
    /// exclusive lock is held.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or locked.
    pub fn acquire(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        file.lock_exclusive().map_err(|source| StorageError::Lock {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the path of the locked file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the file in bytes.
    pub fn len(&self) -> StorageResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Returns true if the file has no content yet.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Reads the whole file.
    ///
    /// Bytes are returned raw: a torn tail may end inside a UTF-8 sequence.
    pub fn read_all(&mut self) -> StorageResult<Vec<u8>> {
        let mut content = Vec::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Cuts the file down to `len` bytes.
    pub fn truncate(&mut self, len: u64) -> StorageResult<()> {
        self.file.set_len(len)?;
        Ok(())
    }

    /// Appends `line` followed by [`LINE_SEPARATOR`] and syncs the data.
    pub fn append_line(&mut self, line: &str) -> StorageResult<()> {
        let mut buf = String::with_capacity(line.len() + LINE_SEPARATOR.len());
        buf.push_str(line);
        buf.push_str(LINE_SEPARATOR);

        self.file.write_all(buf.as_bytes())?;
        self.file.sync_data()?;
        Ok(())
    }
}

impl Drop for AppendLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Appends one line to `path` while holding the file's exclusive lock.
///
/// The file is created if it does not exist. Lines written by concurrent
/// callers never interleave.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, locked or written. The
/// lock is released before returning either way.
pub fn append_line_with_lock(path: &Path, line: &str) -> StorageResult<()> {
    let mut lock = AppendLock::acquire(path)?;
    lock.append_line(line)
}
