// FILENAME: core\persistence\src\xlsx_reader.rs

use crate::{PersistenceError, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Reader};
use engine::cell::CellValue;
use std::collections::HashMap;
use std::path::Path;

/// Reads every worksheet's cached values. Formulas are not evaluated and cell
/// formatting is not carried over; the workbook format is picked from the
/// file extension (xlsx, xlsm, xls, ods).
pub fn load_xlsx(path: &Path) -> Result<Workbook, PersistenceError> {
    if !path.is_file() {
        return Err(PersistenceError::FileNotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let mut sheets = Vec::new();

    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name)?;

        // The range starts at the first used cell, not necessarily A1.
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let mut cells = HashMap::new();

        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let value = match cell {
                    Data::Empty => continue,
                    Data::String(s) => CellValue::Text(s.clone()),
                    Data::Float(f) => CellValue::Number(*f),
                    Data::Int(i) => CellValue::Number(*i as f64),
                    Data::Bool(b) => CellValue::Boolean(*b),
                    Data::Error(e) => CellValue::Error(e.to_string()),
                    Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
                    Data::DateTimeIso(s) => CellValue::Text(s.clone()),
                    Data::DurationIso(s) => CellValue::Text(s.clone()),
                };

                let row = row_offset + row_idx as u32 + 1;
                let col = col_offset + col_idx as u32 + 1;
                cells.insert((row, col), value);
            }
        }

        log::debug!("loaded sheet '{}' ({} cells)", sheet_name, cells.len());
        sheets.push(Sheet {
            name: sheet_name.clone(),
            cells,
        });
    }

    Ok(Workbook {
        sheets,
        active_sheet: 0,
    })
}
