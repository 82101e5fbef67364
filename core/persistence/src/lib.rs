//! FILENAME: core/persistence/src/lib.rs
//! Pickbook Persistence Module
//!
//! Loads source workbooks (cached values only) and writes the rendered report
//! into a copy of the template workbook. The in-memory `Workbook`/`Sheet`
//! model sits between the engine's `Grid` and the file libraries.

mod atomic;
mod error;
mod template;
mod xlsx_reader;

pub use atomic::write_atomic;
pub use error::PersistenceError;
pub use template::ReportTemplate;
pub use xlsx_reader::load_xlsx;

use engine::cell::{Cell, CellValue};
use engine::grid::Grid;
use std::collections::HashMap;

// ============================================================================
// WORKBOOK
// ============================================================================

/// The values of every worksheet of a loaded file, in workbook order.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    pub active_sheet: usize,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Result<&Sheet, PersistenceError> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| PersistenceError::SheetNotFound(name.to_string()))
    }

    pub fn active(&self) -> Result<&Sheet, PersistenceError> {
        self.sheets
            .get(self.active_sheet)
            .ok_or_else(|| PersistenceError::SheetNotFound(format!("#{}", self.active_sheet)))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

// ============================================================================
// SHEET
// ============================================================================

/// Cached values of a single worksheet. Coordinates are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), CellValue>,
}

impl Sheet {
    pub fn new(name: String) -> Self {
        Self {
            name,
            cells: HashMap::new(),
        }
    }

    pub fn to_grid(&self) -> Grid {
        let mut grid = Grid::new();
        for (&(row, col), value) in &self.cells {
            grid.set_cell(row, col, Cell::new(value.clone()));
        }
        grid
    }

    /// Value at a 1-based coordinate, `Empty` when nothing is stored.
    pub fn value(&self, row: u32, col: u32) -> CellValue {
        self.cells.get(&(row, col)).cloned().unwrap_or(CellValue::Empty)
    }
}
