//! Inspect command implementation.

use super::{CommandResult, OutputFormat};
use chrono::NaiveDate;
use folio_core::DataDir;
use folio_storage::is_temp_file_name;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Data directory inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Data directory path.
    pub path: String,
    /// Catalog file statistics.
    pub items: FileStats,
    /// Account file statistics.
    pub accounts: FileStats,
    /// One entry per loan partition, oldest first.
    pub partitions: Vec<PartitionStats>,
    /// Temp files left by interrupted writes.
    pub stale_temp_files: usize,
    /// Total size of all record files in bytes.
    pub total_size: u64,
}

/// Statistics for a collection file.
#[derive(Debug, Serialize)]
pub struct FileStats {
    /// File path.
    pub path: String,
    /// Whether the file exists.
    pub exists: bool,
    /// Size in bytes.
    pub size: u64,
    /// Records decoded (best effort).
    pub records: usize,
}

/// Statistics for one loan partition.
#[derive(Debug, Serialize)]
pub struct PartitionStats {
    /// Partition date.
    pub date: NaiveDate,
    /// Size in bytes.
    pub size: u64,
    /// Events decoded (best effort).
    pub events: usize,
}

/// Runs the inspect command.
pub fn run(dir: &DataDir, format: OutputFormat) -> CommandResult {
    let result = inspect(dir)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_text_output(&result),
    }

    Ok(())
}

/// Collects statistics without printing them.
pub fn inspect(dir: &DataDir) -> CommandResult<InspectResult> {
    let catalog = dir.catalog();
    let accounts = dir.accounts();
    let loans = dir.loans();

    let items = file_stats(catalog.path(), catalog.count());
    let accounts = file_stats(accounts.path(), accounts.count());

    let mut partitions = Vec::new();
    for date in loans.partition_dates()? {
        partitions.push(PartitionStats {
            date,
            size: file_size(&loans.partition_path(date)),
            events: loans.load_for_date(date).len(),
        });
    }

    let mut stale_temp_files = count_temp_files(dir.path())?;
    if loans.dir() != dir.path() {
        stale_temp_files += count_temp_files(loans.dir())?;
    }

    let total_size =
        items.size + accounts.size + partitions.iter().map(|p| p.size).sum::<u64>();

    Ok(InspectResult {
        path: dir.path().display().to_string(),
        items,
        accounts,
        partitions,
        stale_temp_files,
        total_size,
    })
}

fn file_stats(path: &Path, records: usize) -> FileStats {
    FileStats {
        path: path.display().to_string(),
        exists: path.is_file(),
        size: file_size(path),
        records,
    }
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn count_temp_files(dir: &Path) -> CommandResult<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        if is_temp_file_name(&name) {
            count += 1;
        }
    }
    Ok(count)
}

fn print_text_output(result: &InspectResult) {
    println!("Folio Data Directory Inspection");
    println!("===============================");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!("Collections:");
    print_file("Items", &result.items);
    print_file("Accounts", &result.accounts);
    println!();
    println!("Loan partitions: {}", result.partitions.len());
    for partition in &result.partitions {
        println!(
            "  {}  {:>5} event(s)  {}",
            partition.date,
            partition.events,
            format_size(partition.size)
        );
    }
    println!();
    println!("Total size:       {}", format_size(result.total_size));
    println!("Stale temp files: {}", result.stale_temp_files);
}

fn print_file(name: &str, stats: &FileStats) {
    if stats.exists {
        println!(
            "  {:<9} {:>5} record(s)  {}  ({})",
            name,
            stats.records,
            format_size(stats.size),
            stats.path
        );
    } else {
        println!("  {:<9} missing ({})", name, stats.path);
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{CatalogItem, Config, LoanEvent};
    use folio_storage::TEMP_SUFFIX;
    use tempfile::tempdir;

    #[test]
    fn inspect_counts_records_and_partitions() {
        let temp = tempdir().unwrap();
        let dir = DataDir::open(Config::new().data_dir(temp.path())).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        dir.catalog()
            .add(CatalogItem::new("b1", "Dune", "Herbert", "sci-fi", 2, 2))
            .unwrap();
        dir.loans()
            .append(&LoanEvent::issue("t1", "b1", "m1", day, day), day)
            .unwrap();
        fs::write(temp.path().join(format!(".items.csv.x{TEMP_SUFFIX}")), "").unwrap();

        let result = inspect(&dir).unwrap();
        assert_eq!(result.items.records, 1);
        assert!(result.items.exists);
        assert!(!result.accounts.exists);
        assert_eq!(result.partitions.len(), 1);
        assert_eq!(result.partitions[0].events, 1);
        assert_eq!(result.stale_temp_files, 1);
        assert!(result.total_size > 0);
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
