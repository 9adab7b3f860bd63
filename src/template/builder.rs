//! Billing template construction.
//!
//! Two entry points: build the minimal header-only template from scratch,
//! or load an existing workbook and strip the shared formulas out of its
//! data region so the downstream generator can fill it cleanly.

use crate::error::{KitError, KitResult};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Datelike, Local};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::Path;

/// Formula stripping is bounded to the table data region:
/// rows 6-1000, columns A-T (0-based, inclusive).
const STRIP_FIRST_ROW: u32 = 5;
const STRIP_LAST_ROW: u32 = 999;
const STRIP_FIRST_COL: u16 = 0;
const STRIP_LAST_COL: u16 = 19;

/// Build the minimal billing template: header fields only, no table
/// structure. Row 10 is left blank for the table header the downstream
/// generator writes.
pub fn build_template(output: &Path, billing_month: Option<&str>) -> KitResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1").map_err(excel_err)?;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    worksheet
        .merge_range(0, 0, 0, 12, "調剤券請求書", &title_format)
        .map_err(excel_err)?;

    worksheet.write_string(2, 0, "請求年月:").map_err(excel_err)?;
    worksheet.write_string(3, 0, "薬局名:").map_err(excel_err)?;
    worksheet.write_string(4, 0, "医療機関コード:").map_err(excel_err)?;

    let month = match billing_month {
        Some(m) => m.to_string(),
        None => {
            let today = Local::now();
            format!("{}年{}月分", today.year(), today.month())
        }
    };
    worksheet.write_string(2, 1, month).map_err(excel_err)?;
    // B4 (薬局名) and B5 (医療機関コード) are filled in downstream.

    for row in 5..9 {
        worksheet.set_row_height(row, 15).map_err(excel_err)?;
    }
    worksheet.set_row_height(9, 20).map_err(excel_err)?;

    workbook.save(output).map_err(excel_err)?;
    Ok(())
}

/// Copy `input` to `output`, blanking every formula cell inside the
/// bounded data region. Formulas outside the region and all plain values
/// are preserved. Returns the number of cells stripped.
pub fn strip_formulas(input: &Path, output: &Path) -> KitResult<usize> {
    let mut source: Xlsx<_> = open_workbook(input)
        .map_err(|e| KitError::Excel(format!("failed to open {}: {}", input.display(), e)))?;

    let sheet_names = source.sheet_names().to_vec();
    let mut workbook = Workbook::new();
    let mut stripped = 0;

    for sheet_name in &sheet_names {
        let range = source
            .worksheet_range(sheet_name)
            .map_err(|e| KitError::Excel(format!("sheet {}: {}", sheet_name, e)))?;
        let formulas = source.worksheet_formula(sheet_name).ok();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name).map_err(excel_err)?;

        if range.is_empty() {
            continue;
        }

        let start = range.start().unwrap_or((0, 0));
        let (height, width) = range.get_size();

        for rel_row in 0..height {
            for rel_col in 0..width {
                let cell = match range.get((rel_row, rel_col)) {
                    Some(cell) if !matches!(cell, Data::Empty) => cell,
                    _ => continue,
                };

                let row = start.0 + rel_row as u32;
                let col = (start.1 as usize + rel_col) as u16;

                let formula = formulas
                    .as_ref()
                    .and_then(|fr| fr.get_value((row, col as u32)))
                    .filter(|f| !f.is_empty());
                let inline_formula = match cell {
                    Data::String(s) if s.starts_with('=') => Some(s.as_str()),
                    _ => None,
                };

                if formula.is_some() || inline_formula.is_some() {
                    if in_strip_region(row, col) {
                        stripped += 1;
                        continue;
                    }
                    let text = match (formula, inline_formula) {
                        (Some(f), _) => format!("={}", f),
                        (None, Some(f)) => f.to_string(),
                        (None, None) => unreachable!(),
                    };
                    worksheet
                        .write_formula(row, col, text.as_str())
                        .map_err(excel_err)?;
                    continue;
                }

                write_value(worksheet, row, col, cell)?;
            }
        }
    }

    workbook.save(output).map_err(excel_err)?;
    Ok(stripped)
}

fn in_strip_region(row: u32, col: u16) -> bool {
    (STRIP_FIRST_ROW..=STRIP_LAST_ROW).contains(&row)
        && (STRIP_FIRST_COL..=STRIP_LAST_COL).contains(&col)
}

fn write_value(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    cell: &Data,
) -> KitResult<()> {
    match cell {
        Data::String(s) => {
            worksheet.write_string(row, col, s).map_err(excel_err)?;
        }
        Data::Float(f) => {
            worksheet.write_number(row, col, *f).map_err(excel_err)?;
        }
        Data::Int(i) => {
            worksheet
                .write_number(row, col, *i as f64)
                .map_err(excel_err)?;
        }
        Data::Bool(b) => {
            worksheet.write_boolean(row, col, *b).map_err(excel_err)?;
        }
        Data::DateTime(dt) => {
            worksheet
                .write_number(row, col, dt.as_f64())
                .map_err(excel_err)?;
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => {
            worksheet.write_string(row, col, s).map_err(excel_err)?;
        }
        Data::Error(_) | Data::Empty => {}
    }
    Ok(())
}

fn excel_err(e: rust_xlsxwriter::XlsxError) -> KitError {
    KitError::Excel(e.to_string())
}
