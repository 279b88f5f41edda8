//! Clean command implementation.

use super::CommandResult;
use folio_core::DataDir;

/// Runs the clean command.
pub fn run(dir: &DataDir) -> CommandResult {
    let removed = dir.remove_stale_temp_files()?;
    if removed == 0 {
        println!("No stale temp files in {:?}", dir.path());
    } else {
        println!("Removed {} stale temp file(s) from {:?}", removed, dir.path());
    }
    Ok(())
}
