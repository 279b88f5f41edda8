//! Verify command implementation.

use super::CommandResult;
use folio_core::{CollectionStore, DataDir, Record};
use std::collections::HashSet;

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of records decoded.
    pub records_checked: usize,
    /// Problems found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(dir: &DataDir) -> CommandResult {
    println!("Verifying data directory at {:?}", dir.path());
    println!();

    let result = verify(dir)?;

    println!(
        "  files checked: {}, records: {}, problems: {}",
        result.files_checked,
        result.records_checked,
        result.errors.len()
    );
    for error in &result.errors {
        println!("    ERROR: {}", error);
    }

    println!();
    if result.is_ok() {
        println!("✓ Verification passed");
        Ok(())
    } else {
        println!("✗ Verification failed");
        Err("Verification failed".into())
    }
}

/// Strictly decodes every collection and partition.
pub fn verify(dir: &DataDir) -> CommandResult<VerifyResult> {
    let mut result = VerifyResult::default();

    verify_collection(dir.catalog(), &mut result);
    verify_collection(dir.accounts(), &mut result);

    let loans = dir.loans();
    for date in loans.partition_dates()? {
        result.files_checked += 1;
        match loans.scan(date) {
            Ok(scan) => {
                result.records_checked += scan.records.len();
                if scan.torn_tail {
                    result.errors.push(format!(
                        "{}: torn trailing record (interrupted append)",
                        loans.partition_path(date).display()
                    ));
                }
            }
            Err(e) => result.errors.push(e.to_string()),
        }
    }

    Ok(result)
}

fn verify_collection<T: Record>(store: &CollectionStore<T>, result: &mut VerifyResult) {
    if !store.path().exists() {
        return;
    }
    result.files_checked += 1;

    let records = match store.try_load_all() {
        Ok(records) => records,
        Err(e) => {
            result.errors.push(e.to_string());
            return;
        }
    };
    result.records_checked += records.len();

    let mut seen = HashSet::new();
    for record in &records {
        if record.id().is_empty() {
            result
                .errors
                .push(format!("{}: {} with empty id", store.path().display(), T::KIND));
        } else if !seen.insert(record.id()) {
            result.errors.push(format!(
                "{}: duplicate {} id {:?}",
                store.path().display(),
                T::KIND,
                record.id()
            ));
        }
    }
}
