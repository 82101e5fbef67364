//! FILENAME: core/engine/src/grid.rs
//! PURPOSE: Manages the collection of cells of one worksheet.
//! CONTEXT: This file defines the `Grid` struct which acts as the container
//! for all cell data. It uses a sparse storage strategy (HashMap) so that
//! source sheets with wide, mostly empty ranges stay cheap.

use std::collections::HashMap;
use crate::cell::{Cell, CellValue};

static EMPTY: CellValue = CellValue::Empty;

/// The Grid struct holds the cells of a single sheet.
/// Row and Col are 1-based sheet coordinates.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    /// Sparse storage: keys are (row, col), values are Cell instances.
    pub cells: HashMap<(u32, u32), Cell>,

    /// Tracks the highest row index currently in use (0 when empty).
    pub max_row: u32,

    /// Tracks the highest column index currently in use (0 when empty).
    pub max_col: u32,
}

impl Grid {
    /// Creates a new, empty Grid.
    pub fn new() -> Self {
        Grid {
            cells: HashMap::new(),
            max_row: 0,
            max_col: 0,
        }
    }

    /// Sets a cell at the specified coordinates.
    /// Updates max_row/max_col boundaries automatically.
    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        if row > self.max_row {
            self.max_row = row;
        }
        if col > self.max_col {
            self.max_col = col;
        }
        self.cells.insert((row, col), cell);
    }

    /// Retrieves a reference to a cell at the specified coordinates.
    /// Returns None if the cell is not stored.
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// The value at (row, col), or `CellValue::Empty` for unstored cells.
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.cells
            .get(&(row, col))
            .map(|cell| &cell.value)
            .unwrap_or(&EMPTY)
    }

    /// Replaces the value of a cell while keeping its style.
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        let style_index = self.style_index(row, col);
        self.set_cell(row, col, Cell { value, style_index });
    }

    /// Replaces the style of a cell while keeping its value.
    /// An unstored cell is created empty so the style can still be written.
    pub fn set_style(&mut self, row: u32, col: u32, style_index: usize) {
        match self.cells.get_mut(&(row, col)) {
            Some(cell) => cell.style_index = style_index,
            None => self.set_cell(row, col, Cell::new(CellValue::Empty).with_style(style_index)),
        }
    }

    /// The style index at (row, col); 0 (default style) for unstored cells.
    pub fn style_index(&self, row: u32, col: u32) -> usize {
        self.cells
            .get(&(row, col))
            .map(|cell| cell.style_index)
            .unwrap_or(0)
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
