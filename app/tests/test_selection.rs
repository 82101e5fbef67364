//! FILENAME: tests/test_selection.rs
//! Integration tests for per-sheet row selection and CLI selection specs.

use pickbook_lib::selection::MAX_SHEET_ROW;
use pickbook_lib::{RowSelection, SelectionError};

fn rows(selection: &RowSelection, sheet: &str) -> Vec<u32> {
    selection
        .rows_for(sheet)
        .map(|rows| rows.iter().copied().collect())
        .unwrap_or_default()
}

#[test]
fn test_parse_single_rows_and_ranges() {
    let mut selection = RowSelection::new();
    selection.parse_spec("Bonds:5,7-9, 12").unwrap();
    assert_eq!(rows(&selection, "Bonds"), vec![5, 7, 8, 9, 12]);
}

#[test]
fn test_sheet_name_may_contain_colons() {
    let selection = RowSelection::from_specs(&["FX: hedged:6"]).unwrap();
    assert_eq!(rows(&selection, "FX: hedged"), vec![6]);
}

#[test]
fn test_repeated_specs_accumulate() {
    let selection = RowSelection::from_specs(&["Bonds:7", "Equities:5", "Bonds:9,7"]).unwrap();
    assert_eq!(rows(&selection, "Bonds"), vec![7, 9]);
    assert_eq!(rows(&selection, "Equities"), vec![5]);
    assert_eq!(selection.total_rows(), 3);
}

#[test]
fn test_spec_without_rows_selects_nothing() {
    let selection = RowSelection::from_specs(&["Bonds:"]).unwrap();
    assert!(selection.is_empty());
}

#[test]
fn test_malformed_specs() {
    let mut selection = RowSelection::new();
    assert!(matches!(selection.parse_spec("Bonds"), Err(SelectionError::MissingSheet(_))));
    assert!(matches!(selection.parse_spec(":5"), Err(SelectionError::MissingSheet(_))));
    assert!(matches!(
        selection.parse_spec("Bonds:x"),
        Err(SelectionError::InvalidRow { row, .. }) if row == "x"
    ));
    assert!(matches!(selection.parse_spec("Bonds:9-7"), Err(SelectionError::InvalidRow { .. })));
    assert!(matches!(selection.parse_spec("Bonds:0"), Err(SelectionError::InvalidRow { .. })));
    assert!(selection.is_empty());
}

#[test]
fn test_set_rows_replaces_and_toggle_updates() {
    let mut selection = RowSelection::new();
    selection.set_rows("Bonds", [7, 8, 9]);
    selection.set_rows("Bonds", [5]);
    assert_eq!(rows(&selection, "Bonds"), vec![5]);

    selection.toggle("Bonds", 6);
    selection.toggle("Bonds", 5);
    assert_eq!(rows(&selection, "Bonds"), vec![6]);
}

#[test]
fn test_rows_past_the_last_sheet_row_are_rejected() {
    let mut selection = RowSelection::new();
    assert!(matches!(
        selection.parse_spec("Bonds:1-4000000000"),
        Err(SelectionError::InvalidRow { row, .. }) if row == "1-4000000000"
    ));
    assert!(matches!(selection.parse_spec("Bonds:1048577"), Err(SelectionError::InvalidRow { .. })));
    assert!(selection.is_empty());

    selection.parse_spec("Bonds:1048570-1048576").unwrap();
    assert_eq!(selection.total_rows(), 7);
    assert_eq!(selection.rows_for("Bonds").unwrap().last(), Some(&MAX_SHEET_ROW));
}
