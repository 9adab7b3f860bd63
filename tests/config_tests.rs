//! Import descriptor round-trip and resolution tests.

use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use vbakit::config::ImportConfig;

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vba_import_config.json");

    let config = ImportConfig {
        workbook: "billing_20250829.xlsm".to_string(),
        modules: vec![
            "ExcelDocumentModule.bas".to_string(),
            "ExcelMappingModule.bas".to_string(),
        ],
        auto_backup: false,
        modules_dir: "modules".to_string(),
    };
    config.save(&path).unwrap();

    let reloaded = ImportConfig::load(&path).unwrap();
    assert_eq!(reloaded.workbook, config.workbook);
    assert_eq!(reloaded.modules, config.modules);
    assert_eq!(reloaded.auto_backup, config.auto_backup);
    assert_eq!(reloaded, config);
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.json");
    fs::write(&path, r#"{"workbook": "billing.xlsm"}"#).unwrap();

    let config = ImportConfig::load(&path).unwrap();
    assert_eq!(config.workbook, "billing.xlsm");
    assert!(config.modules.is_empty());
    assert!(config.auto_backup);
    assert_eq!(config.modules_dir, "modules");
}

#[test]
fn malformed_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{not json").unwrap();

    assert!(ImportConfig::load(&path).is_err());
}

#[test]
fn resolve_modules_skips_missing_files() {
    let dir = TempDir::new().unwrap();
    let modules_dir = dir.path().join("modules");
    fs::create_dir(&modules_dir).unwrap();
    fs::write(modules_dir.join("Present.bas"), "Sub P()\nEnd Sub\n").unwrap();

    let config = ImportConfig {
        modules: vec!["Present.bas".to_string(), "Absent.bas".to_string()],
        ..ImportConfig::default()
    };

    let resolved = config.resolve_modules(dir.path());
    assert_eq!(resolved, vec![modules_dir.join("Present.bas")]);
}
