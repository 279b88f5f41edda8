//! Append-only, date-partitioned event log.
//!
//! Each calendar day gets its own file in one directory:
//!
//! ```text
//! <dir>/
//! ├─ transactions_2024-03-01.csv
//! ├─ transactions_2024-03-02.csv
//! └─ ...
//! ```
//!
//! A partition starts with a header line followed by one encoded record per
//! line. Appends take the file's exclusive advisory lock, so concurrent
//! writers in any number of threads or processes never interleave. Reads take
//! no lock; a record that is still being written (no terminating line break
//! yet) is skipped.

use crate::error::{CoreError, CoreResult};
use crate::record::LogRecord;
use chrono::NaiveDate;
use folio_codec::{split_records, RawRecord};
use folio_storage::{ensure_data_dir, AppendLock};
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name prefix used when none is configured.
pub const DEFAULT_PARTITION_PREFIX: &str = "transactions";

const PARTITION_EXTENSION: &str = ".csv";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of a strict partition read.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionScan<T> {
    /// Decoded records in file order, header excluded.
    pub records: Vec<T>,
    /// Whether an unterminated trailing record was skipped.
    pub torn_tail: bool,
}

/// Event log with one file per day.
///
/// The log holds no in-process lock and no cache. Every call touches the
/// file system; partitions for different dates are fully independent.
#[derive(Debug, Clone)]
pub struct PartitionedLog<T: LogRecord> {
    dir: PathBuf,
    prefix: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: LogRecord> PartitionedLog<T> {
    /// Creates a log rooted at `dir` with the default file prefix.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_prefix(dir, DEFAULT_PARTITION_PREFIX)
    }

    /// Creates a log rooted at `dir` whose files start with `prefix`.
    pub fn with_prefix(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            _marker: PhantomData,
        }
    }

    /// Directory holding the partitions.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the partition for `date`, whether or not it exists.
    #[must_use]
    pub fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}_{}{PARTITION_EXTENSION}",
            self.prefix,
            date.format(DATE_FORMAT)
        ))
    }

    /// Appends `record` to the partition for `date`.
    ///
    /// Creates the directory and the partition as needed. The header is
    /// written iff the partition is empty. Both checks happen under the lock.
    ///
    /// Before writing, the partition is framed the same way reads frame it.
    /// Any trailing record that is not followed by a line break outside a
    /// quoted span is cut off: a record torn by an interrupted writer, one
    /// torn inside a quoted field that happens to end in a line break, and
    /// also a complete line written by hand without its final line break.
    /// The cut is lossy; the dropped text is logged at `warn` level.
    /// Framing reads the whole partition, so each append costs time
    /// proportional to the size of that day's file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created, locked,
    /// repaired or written.
    pub fn append(&self, record: &T, date: NaiveDate) -> CoreResult<()> {
        ensure_data_dir(&self.dir)?;
        let path = self.partition_path(date);

        let mut lock = AppendLock::acquire(&path)?;
        repair_torn_tail(&mut lock)?;
        if lock.is_empty()? {
            lock.append_line(T::HEADER)?;
        }
        lock.append_line(&record.encode())?;

        debug!(kind = T::KIND, id = record.id(), path = %path.display(), "appended");
        Ok(())
    }

    /// Loads the records of one day's partition in file order.
    ///
    /// Returns an empty list if the partition does not exist or cannot be
    /// read or decoded; the failure is logged.
    pub fn load_for_date(&self, date: NaiveDate) -> Vec<T> {
        match self.try_load_for_date(date) {
            Ok(records) => records,
            Err(error) => {
                warn!(
                    kind = T::KIND,
                    %date,
                    %error,
                    "failed to load partition; treating it as empty"
                );
                Vec::new()
            }
        }
    }

    /// Loads the records of one day's partition, reporting failures.
    pub fn try_load_for_date(&self, date: NaiveDate) -> CoreResult<Vec<T>> {
        self.scan(date).map(|scan| scan.records)
    }

    /// Strict read of one partition that also reports a torn tail.
    pub fn scan(&self, date: NaiveDate) -> CoreResult<PartitionScan<T>> {
        let path = self.partition_path(date);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(PartitionScan {
                    records: Vec::new(),
                    torn_tail: false,
                })
            }
            Err(e) => return Err(e.into()),
        };
        let content = complete_utf8_prefix(&bytes)?;

        let mut records = Vec::new();
        let mut torn_tail = false;
        for (index, raw) in split_records(content).enumerate() {
            if !raw.terminated {
                torn_tail = true;
                continue;
            }
            if raw.is_blank() || (index == 0 && is_header::<T>(&raw)) {
                continue;
            }
            let record =
                T::decode(raw.text).map_err(|source| CoreError::decode(&path, index + 1, source))?;
            records.push(record);
        }

        // Bytes of an unfinished UTF-8 sequence also belong to a torn tail.
        if content.len() < bytes.len() {
            torn_tail = true;
        }

        Ok(PartitionScan { records, torn_tail })
    }

    /// Dates that have a partition file, oldest first.
    ///
    /// Returns an empty list if the directory does not exist. Files that do
    /// not follow the partition naming scheme are ignored.
    pub fn partition_dates(&self) -> CoreResult<Vec<NaiveDate>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(date) = name.to_str().and_then(|name| self.date_of(name)) {
                dates.push(date);
            }
        }
        dates.sort_unstable();
        Ok(dates)
    }

    fn date_of(&self, file_name: &str) -> Option<NaiveDate> {
        let date = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('_')?
            .strip_suffix(PARTITION_EXTENSION)?;
        NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
    }
}

fn is_header<T: LogRecord>(raw: &RawRecord<'_>) -> bool {
    raw.text.trim().eq_ignore_ascii_case(T::HEADER)
}

/// Longest prefix of `bytes` that is valid UTF-8, tolerating only an
/// unfinished sequence at the very end.
fn complete_utf8_prefix(bytes: &[u8]) -> CoreResult<&str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&bytes[..e.valid_up_to()])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into()),
        Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e).into()),
    }
}

/// Length of the prefix of `bytes` made of terminated records.
///
/// Frames on raw bytes like [`split_records`]; quote and line feed bytes
/// never occur inside a multi-byte UTF-8 sequence, so the result is the same
/// and bad bytes earlier in the file do not block a repair.
fn terminated_len(bytes: &[u8]) -> usize {
    let mut in_quotes = false;
    let mut end = 0;
    for (i, byte) in bytes.iter().enumerate() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => end = i + 1,
            _ => {}
        }
    }
    end
}

/// Cuts the unterminated trailing record so the next line starts clean.
fn repair_torn_tail(lock: &mut AppendLock) -> CoreResult<()> {
    let bytes = lock.read_all()?;
    let keep = terminated_len(&bytes);
    if keep == bytes.len() {
        return Ok(());
    }

    warn!(
        path = %lock.path().display(),
        dropped_bytes = bytes.len() - keep,
        dropped = %String::from_utf8_lossy(&bytes[keep..]),
        "truncating unterminated trailing record"
    );
    lock.truncate(keep as u64)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoanEvent;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn issue(id: &str) -> LoanEvent {
        LoanEvent::issue(id, "b1", "m1", date(2024, 3, 1), date(2024, 3, 15))
    }

    #[test]
    fn partition_path_uses_iso_date() {
        let log: PartitionedLog<LoanEvent> = PartitionedLog::new("data");
        assert_eq!(
            log.partition_path(date(2024, 3, 1)),
            Path::new("data").join("transactions_2024-03-01.csv")
        );

        let custom: PartitionedLog<LoanEvent> = PartitionedLog::with_prefix("logs", "loans");
        assert_eq!(
            custom.partition_path(date(2023, 12, 31)),
            Path::new("logs").join("loans_2023-12-31.csv")
        );
    }

    #[test]
    fn first_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path().join("log"));
        let day = date(2024, 3, 1);

        log.append(&issue("t1"), day).unwrap();
        log.append(&issue("t2"), day).unwrap();

        let content = fs::read_to_string(log.partition_path(day)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LoanEvent::HEADER);
        assert!(lines[1].starts_with("t1,"));
    }

    #[test]
    fn missing_partition_is_empty() {
        let dir = tempdir().unwrap();
        let log: PartitionedLog<LoanEvent> = PartitionedLog::new(dir.path());

        assert!(log.load_for_date(date(2024, 1, 1)).is_empty());
        let scan = log.scan(date(2024, 1, 1)).unwrap();
        assert!(scan.records.is_empty());
        assert!(!scan.torn_tail);
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let log: PartitionedLog<LoanEvent> = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 2);
        fs::write(
            log.partition_path(day),
            format!(" {} \n\nt1,b1,m1,,,,0.0,ISSUE\n", LoanEvent::HEADER.to_uppercase()),
        )
        .unwrap();

        let events = log.try_load_for_date(day).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "t1");
    }

    #[test]
    fn headerless_partition_reads_every_record() {
        let dir = tempdir().unwrap();
        let log: PartitionedLog<LoanEvent> = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 3);
        fs::write(log.partition_path(day), "t1,b1,m1,,,,0.0,ISSUE\n").unwrap();

        assert_eq!(log.load_for_date(day).len(), 1);
    }

    #[test]
    fn torn_tail_is_skipped_on_read() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 4);
        log.append(&issue("t1"), day).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(log.partition_path(day))
            .unwrap();
        file.write_all(b"t2,b1,m1,2024-03-").unwrap();

        let scan = log.scan(day).unwrap();
        assert!(scan.torn_tail);
        assert_eq!(scan.records, vec![issue("t1")]);
    }

    #[test]
    fn torn_tail_is_repaired_on_append() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 5);
        log.append(&issue("t1"), day).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(log.partition_path(day))
            .unwrap();
        // Ends inside a quoted span and inside a multi-byte character.
        file.write_all("t2,b1,\"Caf\u{e9}".as_bytes()).unwrap();
        file.write_all(&[0xE2, 0x82]).unwrap();
        drop(file);

        log.append(&issue("t3"), day).unwrap();

        let scan = log.scan(day).unwrap();
        assert!(!scan.torn_tail);
        let ids: Vec<String> = scan.records.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }

    #[test]
    fn torn_quoted_tail_ending_in_newline_is_repaired() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 9);
        log.append(&issue("t1"), day).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(log.partition_path(day))
            .unwrap();
        // The last byte is a line break, but it sits inside an open quote.
        file.write_all(b"t2,b1,\"multi\n").unwrap();
        drop(file);
        assert!(log.scan(day).unwrap().torn_tail);

        log.append(&issue("t3"), day).unwrap();
        log.append(&issue("t4"), day).unwrap();

        let scan = log.scan(day).unwrap();
        assert!(!scan.torn_tail);
        let ids: Vec<String> = scan.records.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["t1", "t3", "t4"]);
    }

    #[test]
    fn line_without_final_newline_is_cut_before_append() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 10);
        fs::write(
            log.partition_path(day),
            format!("{}\nt1,b1,m1,,,,0.0,ISSUE", LoanEvent::HEADER),
        )
        .unwrap();

        log.append(&issue("t2"), day).unwrap();

        let ids: Vec<String> = log.load_for_date(day).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["t2"]);
    }

    #[test]
    fn clean_partition_is_left_untouched_by_append() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 11);
        let mut quoted = issue("t1");
        quoted.catalog_item_id = "line one\nline two".to_owned();
        log.append(&quoted, day).unwrap();
        let before = fs::read(log.partition_path(day)).unwrap();

        log.append(&issue("t2"), day).unwrap();

        let after = fs::read(log.partition_path(day)).unwrap();
        assert!(after.starts_with(&before));
        assert_eq!(log.load_for_date(day), vec![quoted, issue("t2")]);
    }

    #[test]
    fn terminated_len_ignores_quoted_line_breaks() {
        assert_eq!(terminated_len(b""), 0);
        assert_eq!(terminated_len(b"a\nb"), 2);
        assert_eq!(terminated_len(b"a\n\"b\n"), 2);
        assert_eq!(terminated_len(b"a\n\"b\nc\"\n"), 8);
        assert_eq!(terminated_len(b"a,\xFF\r\n"), 5);
    }

    #[test]
    fn torn_header_is_replaced() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 6);
        fs::write(log.partition_path(day), "txId,bookId,mem").unwrap();

        log.append(&issue("t1"), day).unwrap();

        let content = fs::read_to_string(log.partition_path(day)).unwrap();
        assert!(content.starts_with(LoanEvent::HEADER));
        assert_eq!(log.load_for_date(day), vec![issue("t1")]);
    }

    #[test]
    fn decode_failure_is_strict_or_empty() {
        let dir = tempdir().unwrap();
        let log: PartitionedLog<LoanEvent> = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 7);
        fs::write(
            log.partition_path(day),
            format!("{}\nt1,b1,m1,,,,0.0,ISSUE\nt2,b1,m1,,,,0.0,LOST\n", LoanEvent::HEADER),
        )
        .unwrap();

        assert!(log.load_for_date(day).is_empty());
        assert!(matches!(
            log.try_load_for_date(day),
            Err(CoreError::Decode { record: 3, .. })
        ));
    }

    #[test]
    fn invalid_utf8_mid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let log: PartitionedLog<LoanEvent> = PartitionedLog::new(dir.path());
        let day = date(2024, 3, 8);
        fs::write(log.partition_path(day), b"t1,b1,\xFF,,,,0.0,ISSUE\n").unwrap();

        assert!(log.try_load_for_date(day).is_err());
        assert!(log.append(&issue("t2"), day).is_ok());
        assert!(log.try_load_for_date(day).is_err());
    }

    #[test]
    fn partition_dates_are_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let log = PartitionedLog::new(dir.path());
        log.append(&issue("a"), date(2024, 3, 2)).unwrap();
        log.append(&issue("b"), date(2023, 12, 31)).unwrap();
        log.append(&issue("c"), date(2024, 3, 1)).unwrap();
        fs::write(dir.path().join("items.csv"), "").unwrap();
        fs::write(dir.path().join("transactions_notadate.csv"), "").unwrap();
        fs::create_dir(dir.path().join("transactions_2024-01-01.csv")).unwrap();

        assert_eq!(
            log.partition_dates().unwrap(),
            vec![date(2023, 12, 31), date(2024, 3, 1), date(2024, 3, 2)]
        );
    }

    #[test]
    fn partition_dates_of_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let log: PartitionedLog<LoanEvent> = PartitionedLog::new(dir.path().join("absent"));
        assert!(log.partition_dates().unwrap().is_empty());
    }
}
