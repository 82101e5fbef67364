//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the report engine.
//! CONTEXT: Holds the sheet data model (cells, grid, styles) and the
//! row-selection-to-report transformation:
//!   select_columns -> match_columns -> collect_sheet -> VisibleLayout -> render_report
//! Nothing here touches the filesystem.

pub mod cell;
pub mod collector;
pub mod columns;
pub mod coord;
pub mod grid;
pub mod layout;
pub mod matcher;
pub mod render;
pub mod schema;
pub mod style;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellValue};
pub use collector::{collect_sheet, Collection, Group, Record, UsedPositions, DEFAULT_GROUP};
pub use columns::{select_columns, ColumnSelection};
pub use coord::{coord_to_a1, index_to_col, CellCoord};
pub use grid::Grid;
pub use layout::VisibleLayout;
pub use matcher::{match_columns, SourceColumnMap};
pub use render::{render_report, CellChange, MergeRange, RenderedSheet, ReportOptions, WidthPolicy};
pub use schema::{CanonicalColumn, ColumnPosition, HeaderKey, HeaderLookup, SCHEMA_WIDTH};
pub use style::{
    BorderLineStyle, BorderStyle, Borders, CellStyle, Color, FontStyle, NumberFormat,
    StyleRegistry, TextAlign, VerticalAlign,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Source sheet with the two-row header and a mixed body.
    fn bonds_sheet() -> Grid {
        let mut grid = Grid::new();
        grid.set_cell(2, 3, Cell::new_text("ISIN"));
        grid.set_cell(2, 4, Cell::new_text("Name"));
        grid.set_cell(3, 4, Cell::new_text("1"));
        grid.set_cell(2, 5, Cell::new_text("Price"));
        grid.set_cell(3, 5, Cell::new_text("MID"));

        grid.set_cell(6, 3, Cell::new_text("Investment Grade"));
        grid.set_cell(7, 3, Cell::new_text("US1234567890"));
        grid.set_cell(7, 4, Cell::new_text("AcmeCorp"));
        grid.set_cell(7, 5, Cell::new_number(101.25));
        grid.set_cell(8, 3, Cell::new_text("US0987654321"));
        grid.set_cell(8, 4, Cell::new_text("Globex"));
        grid.set_cell(8, 5, Cell::new_number(99.5));
        grid
    }

    #[test]
    fn integration_test_pipeline_with_unused_kept_positions() {
        let sheet = bonds_sheet();
        let selection = select_columns(&[1, 2, 3, 4, 5, 6, 7, 9]);
        let map = match_columns(&sheet, selection.lookup());
        assert_eq!(map.len(), 3);

        let rows: BTreeSet<u32> = [7].into_iter().collect();
        let collection = collect_sheet(&sheet, &map, &rows);
        let layout = VisibleLayout::from_used(collection.used());

        // 2, 3, 4, 6 and 7 are kept but never filled
        let visible: Vec<u8> = layout.positions().iter().map(|p| p.get()).collect();
        assert_eq!(visible, vec![1, 5, 9]);

        let report = render_report(Grid::new(), &layout, &collection, &ReportOptions::default());
        assert_eq!(report.grid.value(4, 1), &CellValue::text("Investment Grade"));
        assert_eq!(report.grid.value(5, 1), &CellValue::text("US1234567890"));
        assert_eq!(report.grid.value(5, 2), &CellValue::text("AcmeCorp"));
        assert_eq!(report.grid.value(5, 3), &CellValue::Number(101.25));
        assert_eq!(report.grid.max_row, 5);
    }

    #[test]
    fn integration_test_rendering_twice_gives_same_sheet() {
        let sheet = bonds_sheet();
        let selection = select_columns(&[1, 5, 9]);
        let map = match_columns(&sheet, selection.lookup());
        let rows: BTreeSet<u32> = [7, 8].into_iter().collect();

        let render = || {
            let collection = collect_sheet(&sheet, &map, &rows);
            let layout = VisibleLayout::from_used(collection.used());
            render_report(Grid::new(), &layout, &collection, &ReportOptions::default())
        };
        let first = render();
        let second = render();

        assert_eq!(first.grid.cells, second.grid.cells);
        assert_eq!(first.merges, second.merges);
        assert_eq!(first.styles.all_styles(), second.styles.all_styles());
    }
}
