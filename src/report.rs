//! Report Projector and spreadsheet export
//!
//! [`project`] maps registry records to [`FlatReportRow`]s (dropping the
//! preserved submission) without filtering or reordering. [`to_xlsx`]
//! encodes the rows as a one-sheet workbook whose header row holds the
//! nine column names. Text longer than an Excel cell allows is cut to fit,
//! so one oversized field never blocks the export of the whole registry.

use std::borrow::Cow;

use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

use crate::error::Result;
use crate::record::{EventRecord, FlatReportRow};
use crate::submission::FIELDS;
use crate::util::constants::{EXPORT_SHEET_NAME, XLSX_MAX_CELL_CHARS};

/// Export column names, in order
pub fn columns() -> [&'static str; 9] {
    FIELDS.map(|f| f.column)
}

/// One row per record, same order, reporting fields only
pub fn project(records: &[EventRecord]) -> Vec<FlatReportRow> {
    records.iter().map(|record| record.flat().clone()).collect()
}

/// Encode rows as an xlsx workbook
pub fn to_xlsx(rows: &[FlatReportRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, name) in columns().iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            write_cell(sheet, r, col as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<()> {
    match value {
        // Empty cells stay blank
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                sheet.write_number(row, col, f)?;
            }
            None => {
                sheet.write_string(row, col, fit_cell(&n.to_string()))?;
            }
        },
        Value::String(s) => {
            sheet.write_string(row, col, fit_cell(s))?;
        }
        other => {
            sheet.write_string(row, col, fit_cell(&other.to_string()))?;
        }
    }
    Ok(())
}

/// Truncate text to the cell limit, counting characters
fn fit_cell(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((cut, _)) => Cow::Owned(text[..cut].to_string()),
        None => Cow::Borrowed(text),
    }
}
