//! FILENAME: core/engine/src/matcher.rs
//! PURPOSE: Resolves a worksheet's source columns to canonical positions.
//! CONTEXT: Source sheets carry a two-row header (rows 2 and 3). Columns 1-2
//! hold structural data and never take part in the value schema, so scanning
//! starts at column 3.

use crate::cell::CellValue;
use crate::grid::Grid;
use crate::schema::{ColumnPosition, HeaderKey, HeaderLookup};
use std::collections::BTreeMap;

pub const HEADER_TOP_ROW: u32 = 2;
pub const HEADER_BOTTOM_ROW: u32 = 3;
pub const FIRST_SCHEMA_COLUMN: u32 = 3;

/// Bottom text used by the fallback key for sheets whose second header row
/// follows a different convention.
pub const FALLBACK_BOTTOM: &str = "1";

/// Source column (1-based) → canonical position, for one worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceColumnMap {
    columns: BTreeMap<u32, ColumnPosition>,
}

impl SourceColumnMap {
    pub fn new() -> Self {
        SourceColumnMap::default()
    }

    pub fn insert(&mut self, source_column: u32, position: ColumnPosition) {
        self.columns.insert(source_column, position);
    }

    pub fn get(&self, source_column: u32) -> Option<ColumnPosition> {
        self.columns.get(&source_column).copied()
    }

    /// Pairs in ascending source-column order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, ColumnPosition)> + '_ {
        self.columns.iter().map(|(&col, &position)| (col, position))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Text legacy sheets put in a header cell that has no label.
pub const ABSENT_MARKER: &str = "0";

/// Header text of a cell; empty cells, empty strings and the text "0" are absent.
fn header_part(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Empty => None,
        CellValue::Text(s) if s == ABSENT_MARKER => None,
        other => {
            let text = other.display_value();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
    }
}

/// Scan header rows 2/3 of `grid` and map every recognised column.
/// The exact (row2, row3) pair is tried first, then (row2, "1").
pub fn match_columns(grid: &Grid, lookup: &HeaderLookup) -> SourceColumnMap {
    let mut map = SourceColumnMap::new();

    for col in FIRST_SCHEMA_COLUMN..=grid.max_col {
        let top = header_part(grid.value(HEADER_TOP_ROW, col));
        let bottom = header_part(grid.value(HEADER_BOTTOM_ROW, col));

        let fallback = HeaderKey {
            top: top.clone(),
            bottom: Some(FALLBACK_BOTTOM.to_string()),
        };
        let primary = HeaderKey { top, bottom };

        let matched = lookup.get(&primary).or_else(|| lookup.get(&fallback));
        match matched {
            Some(position) => {
                log::debug!(
                    "column {} {:?}/{:?} -> position {}",
                    crate::coord::index_to_col(col),
                    primary.top,
                    primary.bottom,
                    position
                );
                map.insert(col, position);
            }
            None => {
                log::trace!("column {} has no known header", crate::coord::index_to_col(col));
            }
        }
    }

    map
}
