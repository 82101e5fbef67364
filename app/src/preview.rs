//! FILENAME: app/src/preview.rs
// PURPOSE: Sheet previews used to decide which rows to pick.
// CONTEXT: Mirrors what the exporter will see: column names come from the two
// header rows (2 and 3) starting at column 3, data rows start at row 5 and
// keep their sheet row number so they can be passed back as a selection.

use crate::error::ExportError;
use engine::cell::CellValue;
use engine::collector::FIRST_DATA_ROW;
use engine::grid::Grid;
use engine::matcher::{FIRST_SCHEMA_COLUMN, HEADER_BOTTOM_ROW, HEADER_TOP_ROW};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    /// 1-based sheet row, usable in a `SHEET:ROWS` selection.
    pub sheet_row: u32,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetPreview {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<PreviewRow>,
    /// Longest text per column, never shorter than the column name.
    pub max_lengths: Vec<usize>,
}

fn header_text(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        other => other.display_value(),
    }
}

/// "top bottom" when both header rows have text, else whichever has, else "Column N".
pub fn column_name(top: &str, bottom: &str, col: u32) -> String {
    match (top.is_empty(), bottom.is_empty()) {
        (false, false) => format!("{} {}", top, bottom),
        (false, true) => top.to_string(),
        (true, false) => bottom.to_string(),
        (true, true) => format!("Column {}", col),
    }
}

pub fn preview_grid(name: &str, grid: &Grid) -> SheetPreview {
    let source_columns: Vec<u32> = (FIRST_SCHEMA_COLUMN..=grid.max_col).collect();

    let columns: Vec<String> = source_columns
        .iter()
        .map(|&col| {
            column_name(
                &header_text(grid.value(HEADER_TOP_ROW, col)),
                &header_text(grid.value(HEADER_BOTTOM_ROW, col)),
                col,
            )
        })
        .collect();

    let rows: Vec<PreviewRow> = (FIRST_DATA_ROW..=grid.max_row)
        .map(|row| PreviewRow {
            sheet_row: row,
            values: source_columns
                .iter()
                .map(|&col| grid.value(row, col).display_value())
                .collect(),
        })
        .collect();

    let max_lengths = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row.values[i].chars().count())
                .fold(name.chars().count(), usize::max)
        })
        .collect();

    SheetPreview {
        name: name.to_string(),
        columns,
        rows,
        max_lengths,
    }
}

/// Load every sheet of `path` for preview, in workbook order.
pub fn load_sheets(path: &Path) -> Result<Vec<SheetPreview>, ExportError> {
    let workbook = persistence::load_xlsx(path).map_err(|e| ExportError::load(path, e))?;
    Ok(workbook
        .sheets
        .iter()
        .map(|sheet| {
            let grid = sheet.to_grid();
            preview_grid(&sheet.name, &grid)
        })
        .collect())
}
