//! FILENAME: app/src/selection.rs
// PURPOSE: Tracks which sheet rows the user picked, per sheet.
// CONTEXT: Row numbers are 1-based sheet rows, the same numbers the preview
// prints next to each data row.

use crate::error::SelectionError;
use std::collections::{BTreeMap, BTreeSet};

/// Last row of an xlsx worksheet; no selection can reach past it.
pub const MAX_SHEET_ROW: u32 = 1_048_576;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    sheets: BTreeMap<String, BTreeSet<u32>>,
}

impl RowSelection {
    pub fn new() -> Self {
        RowSelection::default()
    }

    /// Select `row` if unselected, otherwise unselect it. Returns the new state.
    pub fn toggle(&mut self, sheet: &str, row: u32) -> bool {
        let rows = self.sheets.entry(sheet.to_string()).or_default();
        if rows.remove(&row) {
            false
        } else {
            rows.insert(row);
            true
        }
    }

    /// Replace the sheet's selection.
    pub fn set_rows(&mut self, sheet: &str, rows: impl IntoIterator<Item = u32>) {
        self.sheets.insert(sheet.to_string(), rows.into_iter().collect());
    }

    /// Add rows to the sheet's selection.
    pub fn add_rows(&mut self, sheet: &str, rows: impl IntoIterator<Item = u32>) {
        self.sheets.entry(sheet.to_string()).or_default().extend(rows);
    }

    pub fn rows_for(&self, sheet: &str) -> Option<&BTreeSet<u32>> {
        self.sheets.get(sheet)
    }

    /// True when no sheet has a selected row.
    pub fn is_empty(&self) -> bool {
        self.sheets.values().all(BTreeSet::is_empty)
    }

    pub fn sheets(&self) -> impl Iterator<Item = (&str, &BTreeSet<u32>)> {
        self.sheets.iter().map(|(name, rows)| (name.as_str(), rows))
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.values().map(BTreeSet::len).sum()
    }

    /// Parse a `SHEET:ROWS` spec such as `Bonds:5,7-9` and merge it in.
    /// The sheet name runs up to the last `:`, so names may contain colons.
    pub fn parse_spec(&mut self, spec: &str) -> Result<(), SelectionError> {
        let (sheet, rows) = spec
            .rsplit_once(':')
            .filter(|(sheet, _)| !sheet.is_empty())
            .ok_or_else(|| SelectionError::MissingSheet(spec.to_string()))?;

        let mut parsed = BTreeSet::new();
        for part in rows.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let invalid = || SelectionError::InvalidRow {
                spec: spec.to_string(),
                row: part.to_string(),
            };
            match part.split_once('-') {
                Some((start, end)) => {
                    let start: u32 = start.trim().parse().map_err(|_| invalid())?;
                    let end: u32 = end.trim().parse().map_err(|_| invalid())?;
                    if start == 0 || end < start || end > MAX_SHEET_ROW {
                        return Err(invalid());
                    }
                    parsed.extend(start..=end);
                }
                None => {
                    let row: u32 = part.parse().map_err(|_| invalid())?;
                    if row == 0 || row > MAX_SHEET_ROW {
                        return Err(invalid());
                    }
                    parsed.insert(row);
                }
            }
        }

        self.add_rows(sheet, parsed);
        Ok(())
    }

    /// Build a selection from several specs.
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self, SelectionError> {
        let mut selection = RowSelection::new();
        for spec in specs {
            selection.parse_spec(spec.as_ref())?;
        }
        Ok(selection)
    }
}
