//! File registry behavior: ordering, uniqueness, status updates.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vbakit::encoding::DetectedEncoding;
use vbakit::registry::{AddOutcome, FileRegistry, ModuleStatus};

fn bas_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// ADD / REMOVE / CLEAR
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn adding_same_path_twice_keeps_one_entry() {
    let dir = TempDir::new().unwrap();
    let path = bas_file(&dir, "Module1.bas", "Sub Main()\nEnd Sub\n");

    let mut registry = FileRegistry::new();
    assert_eq!(registry.add(&path), AddOutcome::Added);
    assert_eq!(registry.add(&path), AddOutcome::Duplicate);
    assert_eq!(registry.len(), 1);
}

#[test]
fn new_entries_start_pending_with_detected_encoding() {
    let dir = TempDir::new().unwrap();
    let path = bas_file(&dir, "Module1.bas", "' plain ascii\n");

    let mut registry = FileRegistry::new();
    registry.add(&path);

    let entry = &registry.entries()[0];
    assert_eq!(entry.status, ModuleStatus::Pending);
    assert_eq!(entry.encoding, DetectedEncoding::Utf8);
    assert_eq!(entry.file_name(), "Module1.bas");
    assert_eq!(entry.module_name(), "Module1");
}

#[test]
fn unreadable_file_degrades_to_unknown_encoding() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("Ghost.bas");

    let mut registry = FileRegistry::new();
    assert_eq!(registry.add(&missing), AddOutcome::Added);
    assert_eq!(registry.entries()[0].encoding, DetectedEncoding::Unknown);
}

#[test]
fn remove_deletes_matching_paths_only() {
    let dir = TempDir::new().unwrap();
    let a = bas_file(&dir, "A.bas", "a");
    let b = bas_file(&dir, "B.bas", "b");

    let mut registry = FileRegistry::new();
    registry.add(&a);
    registry.add(&b);

    registry.remove(&[a]);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.entries()[0].file_name(), "B.bas");
}

#[test]
fn clear_empties_the_registry() {
    let dir = TempDir::new().unwrap();
    let a = bas_file(&dir, "A.bas", "a");

    let mut registry = FileRegistry::new();
    registry.add(&a);
    registry.clear();
    assert!(registry.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// STATUS UPDATES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn update_status_mutates_matching_entry() {
    let dir = TempDir::new().unwrap();
    let a = bas_file(&dir, "A.bas", "a");

    let mut registry = FileRegistry::new();
    registry.add(&a);
    registry.update_status(
        "A.bas",
        Some(DetectedEncoding::ShiftJis),
        Some(ModuleStatus::Converted),
    );

    let entry = &registry.entries()[0];
    assert_eq!(entry.encoding, DetectedEncoding::ShiftJis);
    assert_eq!(entry.status, ModuleStatus::Converted);
}

#[test]
fn update_status_by_name_hits_first_entry_only() {
    // Two different paths sharing a display name: updates land on the
    // first entry. Pinned deliberately; see the registry docs.
    let dir = TempDir::new().unwrap();
    let sub_a = dir.path().join("a");
    let sub_b = dir.path().join("b");
    fs::create_dir_all(&sub_a).unwrap();
    fs::create_dir_all(&sub_b).unwrap();
    let first = sub_a.join("Module1.bas");
    let second = sub_b.join("Module1.bas");
    fs::write(&first, "first").unwrap();
    fs::write(&second, "second").unwrap();

    let mut registry = FileRegistry::new();
    registry.add(&first);
    registry.add(&second);

    registry.update_status("Module1.bas", None, Some(ModuleStatus::ImportFailed));

    assert_eq!(registry.entries()[0].status, ModuleStatus::ImportFailed);
    assert_eq!(registry.entries()[1].status, ModuleStatus::Pending);
}

#[test]
fn update_status_with_unknown_name_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let a = bas_file(&dir, "A.bas", "a");

    let mut registry = FileRegistry::new();
    registry.add(&a);
    registry.update_status("Missing.bas", None, Some(ModuleStatus::ImportFailed));

    assert_eq!(registry.entries()[0].status, ModuleStatus::Pending);
}
