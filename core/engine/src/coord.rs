//! FILENAME: core/engine/src/coord.rs
//! PURPOSE: Utilities for converting between spreadsheet coordinate formats.
//! CONTEXT: Everything in this workspace addresses cells with 1-based
//! (row, col) pairs, exactly as a user reads them in a spreadsheet:
//! column "A" = 1, "B" = 2, ..., "Z" = 26, "AA" = 27. Conversions to the
//! 0-based indices of the XLSX libraries happen only in the persistence crate.

/// A cell coordinate as (row, col) with 1-based indices.
pub type CellCoord = (u32, u32);

/// Converts a 1-based column index to a column string.
/// 1 -> "A", 26 -> "Z", 27 -> "AA". Index 0 has no letter form and yields "".
pub fn index_to_col(col_index: u32) -> String {
    let mut result = String::new();
    let mut n = col_index;
    while n > 0 {
        let remainder = (n - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }
    result
}

/// Converts a 1-based (row, col) coordinate to an A1-style reference string.
/// (1, 1) -> "A1", (5, 3) -> "C5"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row)
}
