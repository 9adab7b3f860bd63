//! Template builder and formula stripping tests.

use calamine::{open_workbook, Data, Reader, Xlsx};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;
use vbakit::template::{build_template, strip_formulas};

#[test]
fn built_template_has_header_fields() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("template-clean.xlsx");

    build_template(&output, Some("2025年2月分")).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&output).unwrap();
    assert_eq!(workbook.sheet_names().to_vec(), vec!["Sheet1".to_string()]);

    let range = workbook.worksheet_range("Sheet1").unwrap();
    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("調剤券請求書".to_string()))
    );
    assert_eq!(
        range.get_value((2, 0)),
        Some(&Data::String("請求年月:".to_string()))
    );
    assert_eq!(
        range.get_value((2, 1)),
        Some(&Data::String("2025年2月分".to_string()))
    );
    assert_eq!(
        range.get_value((4, 0)),
        Some(&Data::String("医療機関コード:".to_string()))
    );
}

#[test]
fn built_template_defaults_to_current_month() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("template.xlsx");

    build_template(&output, None).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&output).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    match range.get_value((2, 1)) {
        Some(Data::String(s)) => assert!(s.ends_with("月分"), "unexpected label: {}", s),
        other => panic!("expected month label, got {:?}", other),
    }
}

#[test]
fn strip_blanks_formulas_inside_the_data_region_only() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.xlsx");
    let output = dir.path().join("clean.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Data").unwrap();
    worksheet.write_string(0, 0, "header").unwrap();
    // Row 2: outside the strip region, formula survives.
    worksheet.write_formula(1, 1, "=A1*2").unwrap();
    // Row 7, col A: inside the region, formula is blanked.
    worksheet.write_formula(6, 0, "=A1+1").unwrap();
    worksheet.write_string(6, 1, "data").unwrap();
    worksheet.write_number(7, 2, 42.0).unwrap();
    workbook.save(&source).unwrap();

    let stripped = strip_formulas(&source, &output).unwrap();
    assert_eq!(stripped, 1);

    let mut cleaned: Xlsx<_> = open_workbook(&output).unwrap();
    let range = cleaned.worksheet_range("Data").unwrap();

    // In-region formula gone, plain values intact.
    assert!(matches!(
        range.get_value((6, 0)),
        None | Some(Data::Empty)
    ));
    assert_eq!(
        range.get_value((6, 1)),
        Some(&Data::String("data".to_string()))
    );
    assert_eq!(range.get_value((7, 2)), Some(&Data::Float(42.0)));
    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("header".to_string()))
    );

    // Out-of-region formula survives.
    let formulas = cleaned.worksheet_formula("Data").unwrap();
    let kept = formulas.get_value((1, 1)).cloned().unwrap_or_default();
    assert!(kept.contains("A1*2"), "formula missing: {:?}", kept);
}

#[test]
fn strip_of_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.xlsx");
    let output = dir.path().join("out.xlsx");

    assert!(strip_formulas(&missing, &output).is_err());
}
