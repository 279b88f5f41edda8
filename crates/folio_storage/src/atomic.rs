//! Atomic whole-file replacement.
//!
//! The write protocol:
//!
//! 1. Create a uniquely named temporary file next to the target
//! 2. Write the new content and `fsync` it
//! 3. Rename the temporary file over the target (atomic on one volume)
//! 4. `fsync` the directory so the rename itself is durable
//!
//! Only step 3 touches the target. If anything fails earlier the temporary
//! file is removed and the target keeps its previous bytes.

use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Suffix of the temporary files created while replacing a file.
pub const TEMP_SUFFIX: &str = ".folio.tmp";

/// Creates `dir` and its parents if they are missing.
///
/// Succeeds without doing anything if the directory already exists.
pub fn ensure_data_dir(dir: &Path) -> StorageResult<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Replaces the content of `path` with `content`.
///
/// Concurrent readers observe either the complete old content or the
/// complete new content. The parent directory is created if needed.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or the final
/// rename fails. The target is left untouched in both cases.
pub fn write_atomically(path: &Path, content: &str) -> StorageResult<()> {
    write_atomically_with(path, |writer| writer.write_all(content.as_bytes()))
}

/// Replaces the content of `path` with whatever `write_fn` writes.
///
/// This avoids building large content in memory. If `write_fn` returns an
/// error the replacement is abandoned before the rename.
///
/// # Errors
///
/// Returns the error produced by `write_fn`, or any I/O error raised while
/// syncing or renaming.
pub fn write_atomically_with<F>(path: &Path, write_fn: F) -> StorageResult<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = parent_dir(path);
    ensure_data_dir(dir)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_fn(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| StorageError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    sync_directory(dir)?;
    debug!(path = %path.display(), "replaced file atomically");

    Ok(())
}

/// Returns true if `name` is the file name of an atomic write's temp file.
#[must_use]
pub fn is_temp_file_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// Removes temporary files left behind by interrupted atomic writes.
///
/// Only call this while no writer is active on `dir`: a live writer's
/// temporary file would be removed from under it and its rename would fail.
///
/// Returns the number of files removed. A missing directory counts as clean.
pub fn remove_stale_temp_files(dir: &Path) -> StorageResult<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if is_temp_file_name(&name) && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    if removed > 0 {
        debug!(dir = %dir.display(), removed, "removed stale temp files");
    }
    Ok(removed)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_directory(dir: &Path) -> StorageResult<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> StorageResult<()> {
    // NTFS journals the rename; directory handles cannot be fsynced.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn temp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(TEMP_SUFFIX)
            })
            .count()
    }

    #[test]
    fn write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.csv");

        write_atomically(&path, "a,b\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");
        assert_eq!(temp_files(dir.path()), 0);
    }

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.csv");

        write_atomically(&path, "old content that is longer\n").unwrap();
        write_atomically(&path, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("items.csv");

        write_atomically(&path, "x\n").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn failed_write_leaves_target_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.csv");
        write_atomically(&path, "b1,original\n").unwrap();
        let before = fs::read(&path).unwrap();

        let result = write_atomically_with(&path, |writer| {
            writer.write_all(b"b1,half-writ")?;
            Err(io::Error::new(io::ErrorKind::Other, "simulated crash"))
        });

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(temp_files(dir.path()), 0);
    }

    #[test]
    fn failed_first_write_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.csv");

        let result = write_atomically_with(&path, |_| {
            Err(io::Error::new(io::ErrorKind::Other, "simulated crash"))
        });

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn streaming_writer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.csv");

        write_atomically_with(&path, |writer| {
            writeln!(writer, "line 1")?;
            writeln!(writer, "line 2")
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "line 1\nline 2\n");
    }

    #[test]
    fn ensure_data_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data").join("sub");

        ensure_data_dir(&data).unwrap();
        ensure_data_dir(&data).unwrap();

        assert!(data.is_dir());
    }

    #[test]
    fn stale_temp_files_are_removed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(format!(".items.csv.abc123{TEMP_SUFFIX}")), "x").unwrap();
        fs::write(dir.path().join(format!(".accounts.csv.zz{TEMP_SUFFIX}")), "y").unwrap();
        fs::write(dir.path().join("items.csv"), "keep").unwrap();

        assert_eq!(remove_stale_temp_files(dir.path()).unwrap(), 2);
        assert_eq!(temp_files(dir.path()), 0);
        assert!(dir.path().join("items.csv").exists());
    }

    #[test]
    fn temp_file_names_are_recognized() {
        assert!(is_temp_file_name(&format!(".items.csv.abc123{TEMP_SUFFIX}")));
        assert!(!is_temp_file_name("items.csv"));
        assert!(!is_temp_file_name(".hidden"));
        assert!(!is_temp_file_name(&format!("items{TEMP_SUFFIX}")));
    }

    #[test]
    fn interrupted_write_leaves_a_recognized_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.csv");

        let result = write_atomically_with(&path, |_| {
            let names: Vec<String> = fs::read_dir(dir.path())
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            assert_eq!(names.len(), 1);
            assert!(is_temp_file_name(&names[0]));
            Err(io::Error::new(io::ErrorKind::Other, "stop"))
        });

        assert!(result.is_err());
    }

    #[test]
    fn stale_cleanup_on_missing_dir() {
        let dir = tempdir().unwrap();
        assert_eq!(remove_stale_temp_files(&dir.path().join("nope")).unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn readers_never_see_partial_content() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::thread;

        let dir = tempdir().unwrap();
        let path = dir.path().join("items.csv");
        let small = "s\n".repeat(10);
        let large = "l\n".repeat(5_000);
        write_atomically(&path, &small).unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let reader = {
            let path = path.clone();
            let done = Arc::clone(&done);
            let (small, large) = (small.clone(), large.clone());
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    let content = fs::read_to_string(&path).unwrap();
                    assert!(content == small || content == large);
                }
            })
        };

        for i in 0..50 {
            let content = if i % 2 == 0 { &large } else { &small };
            write_atomically(&path, content).unwrap();
        }
        done.store(true, Ordering::SeqCst);
        reader.join().unwrap();
    }
}
