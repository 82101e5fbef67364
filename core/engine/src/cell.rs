//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the data structures for a single spreadsheet cell.
//! CONTEXT: This file contains the `Cell` struct and `CellValue` enum.
//! Values are the cached results read from a workbook; formulas are never
//! evaluated. `CellValue` has total equality so whole rows of values can be
//! deduplicated in hash sets.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Represents the raw data within a cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    /// Excel serial date/time (days since 1899-12-30).
    DateTime(f64),
    /// Error literal such as `#N/A`, kept as text.
    Error(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Whether the value counts as "present" for grouping and column usage.
    /// Blank text, zero and `false` are treated like an empty cell.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Number(n) | CellValue::DateTime(n) => *n != 0.0,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Boolean(b) => *b,
            CellValue::Error(_) => true,
        }
    }

    /// A number with a fractional part. Integral numbers stay unformatted.
    pub fn is_fractional(&self) -> bool {
        matches!(self, CellValue::Number(n) if n.fract() != 0.0)
    }

    /// Returns the display value of the cell as a String.
    /// Used for identifier/label classification and header text.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) | CellValue::DateTime(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }
}

// Numbers compare by bit pattern so that `Eq` is reflexive (NaN == NaN).
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => true,
            (CellValue::Number(a), CellValue::Number(b)) => a.to_bits() == b.to_bits(),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            (CellValue::Error(a), CellValue::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Empty => {}
            CellValue::Number(n) | CellValue::DateTime(n) => n.to_bits().hash(state),
            CellValue::Text(s) | CellValue::Error(s) => s.hash(state),
            CellValue::Boolean(b) => b.hash(state),
        }
    }
}

/// The atomic unit of the grid: a value plus a reference into the StyleRegistry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub style_index: usize,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Cell {
            value,
            style_index: 0,
        }
    }

    pub fn new_number(num: f64) -> Self {
        Cell::new(CellValue::Number(num))
    }

    pub fn new_text(text: impl Into<String>) -> Self {
        Cell::new(CellValue::Text(text.into()))
    }

    pub fn with_style(mut self, style_index: usize) -> Self {
        self.style_index = style_index;
        self
    }
}
