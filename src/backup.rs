//! Timestamped workbook backups, created before a mutating import run.

use crate::error::KitResult;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Backup path for a workbook at a given instant:
/// `<stem>.backup_<YYYYMMDD_HHMMSS><ext>`, sibling of the original.
pub fn backup_path_for(workbook: &Path, timestamp: DateTime<Local>) -> PathBuf {
    let stem = workbook
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("workbook");
    let ext = workbook
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let name = format!("{}.backup_{}{}", stem, timestamp.format("%Y%m%d_%H%M%S"), ext);
    workbook.with_file_name(name)
}

/// Copy the workbook to a timestamped sibling. Backups are never deleted
/// by this tool. Callers treat failure as non-fatal.
pub fn create_backup(workbook: &Path) -> KitResult<PathBuf> {
    let backup_path = backup_path_for(workbook, Local::now());
    fs::copy(workbook, &backup_path)?;
    info!("backup created: {}", backup_path.display());
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn backup_name_carries_timestamp_and_extension() {
        let at = Local.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        let path = backup_path_for(Path::new("/work/X.xlsm"), at);
        assert_eq!(path, Path::new("/work/X.backup_20250201_100000.xlsm"));
    }

    #[test]
    fn extensionless_workbook_gets_no_trailing_dot() {
        let at = Local.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        let path = backup_path_for(Path::new("/work/book"), at);
        assert_eq!(path, Path::new("/work/book.backup_20250201_100000"));
    }
}
