//! Whole-file collection store.
//!
//! A [`CollectionStore`] keeps every record of one kind in a single file,
//! one record per line, and rewrites the whole file on each mutation:
//!
//! ```text
//! add / update:  lock(write) ─► read all ─► change in memory ─► write_atomically ─► unlock
//! load / find:   lock(read)  ─► read all ─► unlock
//! ```
//!
//! Each mutation is O(n) in the size of the collection. In exchange the only
//! write primitive is "replace everything atomically", so no partial update
//! can ever be observed.

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use folio_codec::split_records;
use folio_storage::{write_atomically_with, LINE_SEPARATOR};
use parking_lot::RwLock;
use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file-backed set of records with unique identities.
///
/// # Thread Safety
///
/// Reads share the store's lock; mutations hold it exclusively for the whole
/// read-modify-write cycle. The lock belongs to this instance, so stores over
/// different files never contend. Nothing is cached between calls: external
/// edits to the file are visible on the next call.
///
/// # Failure policy
///
/// Best-effort reads ([`load_all`](Self::load_all),
/// [`find_by_id`](Self::find_by_id)) log failures and report nothing found.
/// Writes always return their failure, since a lost write would leave the
/// caller believing something that is not on disk.
///
/// # Example
///
/// ```rust
/// use folio_core::{CatalogItem, CollectionStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = CollectionStore::new(dir.path().join("items.csv"));
///
/// store.add(CatalogItem::new("b1", "Dune", "Herbert", "sci-fi", 2, 2)).unwrap();
/// let found = store.find_by_id("b1").unwrap();
/// assert_eq!(found.available_copies, 2);
/// ```
#[derive(Debug)]
pub struct CollectionStore<T: Record> {
    path: PathBuf,
    lock: RwLock<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> CollectionStore<T> {
    /// Creates a store backed by `path`.
    ///
    /// Nothing is touched on disk until the first write; a missing file reads
    /// as an empty collection.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
            _marker: PhantomData,
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record in file order.
    ///
    /// Returns an empty list if the file does not exist or cannot be read or
    /// decoded; the failure is logged.
    pub fn load_all(&self) -> Vec<T> {
        let _guard = self.lock.read();
        self.read_or_empty()
    }

    /// Loads every record in file order, reporting read and decode failures.
    pub fn try_load_all(&self) -> CoreResult<Vec<T>> {
        let _guard = self.lock.read();
        self.read_records()
    }

    /// Returns the first record whose id equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<T> {
        self.load_all().into_iter().find(|record| record.id() == id)
    }

    /// Number of records currently stored (best effort).
    pub fn count(&self) -> usize {
        self.load_all().len()
    }

    /// Replaces the stored collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written. The previous content is
    /// kept intact in that case.
    pub fn save_all(&self, records: &[T]) -> CoreResult<()> {
        let _guard = self.lock.write();
        self.write_records(records)
    }

    /// Adds a record with a new identity.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateId`] if a record with the same id is
    /// already stored, or any read, decode or write failure.
    pub fn add(&self, record: T) -> CoreResult<()> {
        let _guard = self.lock.write();
        let mut records = self.read_records()?;

        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(CoreError::duplicate_id(T::KIND, record.id()));
        }

        records.push(record);
        self.write_records(&records)
    }

    /// Replaces the first record with the same id, or appends it if absent.
    ///
    /// The position of every other record is preserved.
    ///
    /// # Errors
    ///
    /// Returns any read, decode or write failure.
    pub fn update(&self, record: T) -> CoreResult<()> {
        let _guard = self.lock.write();
        let mut records = self.read_records()?;

        match records.iter().position(|existing| existing.id() == record.id()) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }

        self.write_records(&records)
    }

    fn read_or_empty(&self) -> Vec<T> {
        match self.read_records() {
            Ok(records) => records,
            Err(error) => {
                warn!(
                    kind = T::KIND,
                    path = %self.path.display(),
                    %error,
                    "failed to load records; treating collection as empty"
                );
                Vec::new()
            }
        }
    }

    fn read_records(&self) -> CoreResult<Vec<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        split_records(&content)
            .enumerate()
            .filter(|(_, raw)| !raw.is_blank())
            .map(|(index, raw)| {
                T::decode(raw.text).map_err(|source| CoreError::decode(&self.path, index + 1, source))
            })
            .collect()
    }

    fn write_records(&self, records: &[T]) -> CoreResult<()> {
        write_atomically_with(&self.path, |writer: &mut dyn Write| {
            for record in records {
                writer.write_all(record.encode().as_bytes())?;
                writer.write_all(LINE_SEPARATOR.as_bytes())?;
            }
            Ok(())
        })?;

        debug!(
            kind = T::KIND,
            path = %self.path.display(),
            records = records.len(),
            "saved collection"
        );
        Ok(())
    }
}
