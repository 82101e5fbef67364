//! FILENAME: core/engine/src/render.rs
//! PURPOSE: Lays the collected groups out on the report sheet.
//! CONTEXT: The renderer overlays onto the template sheet's grid:
//!   row 1      - portfolio title, merged across the visible columns
//!   rows 2-3   - the two-row canonical header of each visible position
//!   rows 4..   - per group a shaded banner row, then one row per record
//! It produces values, styles, merges and column widths, plus the list of
//! cells it changed relative to the template. Writing the file is the
//! persistence layer's job.

use crate::cell::{Cell, CellValue};
use crate::collector::Collection;
use crate::coord::coord_to_a1;
use crate::grid::Grid;
use crate::layout::VisibleLayout;
use crate::schema;
use crate::style::{CellStyle, Color, NumberFormat, StyleRegistry, TextAlign, VerticalAlign};
use std::collections::BTreeMap;

pub const TITLE_ROW: u32 = 1;
pub const HEADER_TOP_ROW: u32 = 2;
pub const HEADER_BOTTOM_ROW: u32 = 3;
pub const FIRST_BODY_ROW: u32 = 4;

pub const DEFAULT_TITLE: &str = "Balanced Portfolio";
pub const DEFAULT_COLUMN_WIDTH: f64 = 15.0;

const REPORT_FONT: &str = "Calabria Light";
const TITLE_FONT_SIZE: u8 = 40;
const TITLE_GREY: Color = Color::new(0x80, 0x80, 0x80);
const BANNER_FILL: Color = Color::new(0xC0, 0xC0, 0xC0);

// Content-based widths
const MEASURE_LIMIT: usize = 50;
const WIDTH_PADDING: f64 = 2.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;

const DATE_FORMAT: &str = "yyyy-mm-dd";

/// How output column widths are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthPolicy {
    /// Every visible column gets [`DEFAULT_COLUMN_WIDTH`].
    #[default]
    Constant,
    /// Longest display text in the column (counted up to 50) plus 2, at most 60.
    Content,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    pub widths: WidthPolicy,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            title: DEFAULT_TITLE.to_string(),
            widths: WidthPolicy::Constant,
        }
    }
}

/// Inclusive 1-based cell range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

/// A fully laid out report sheet.
#[derive(Debug, Clone)]
pub struct RenderedSheet {
    pub grid: Grid,
    pub styles: StyleRegistry,
    pub merges: Vec<MergeRange>,
    /// 1-based column → width in character units.
    pub column_widths: BTreeMap<u32, f64>,
    /// Cells the report wrote, in row-major order.
    pub changes: Vec<CellChange>,
}

/// One cell the report touched. Cells of the base sheet that the report left
/// alone are not listed, so their original formatting can be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub row: u32,
    pub col: u32,
    pub value_changed: bool,
    pub style_changed: bool,
}

/// Style indices used while rendering, registered once per report.
struct ReportStyles {
    title: usize,
    banner: usize,
    value: usize,
    fractional: usize,
    date: usize,
}

impl ReportStyles {
    fn register(registry: &mut StyleRegistry) -> Self {
        let title = registry.get_or_create(
            CellStyle::new()
                .with_font(REPORT_FONT, TITLE_FONT_SIZE)
                .with_bold(true)
                .with_text_color(TITLE_GREY)
                .with_text_align(TextAlign::Center)
                .with_vertical_align(VerticalAlign::Middle),
        );
        let banner = registry.get_or_create(
            CellStyle::new()
                .with_font(REPORT_FONT, crate::style::DEFAULT_FONT_SIZE)
                .with_bold(true)
                .with_text_color(TITLE_GREY)
                .with_background(BANNER_FILL),
        );
        let value = registry.get_or_create(
            CellStyle::new()
                .with_text_align(TextAlign::Left)
                .with_vertical_align(VerticalAlign::Bottom),
        );
        let fractional = registry.derive(value, |style| {
            style.with_number_format(NumberFormat::Number {
                decimal_places: 1,
                use_thousands_separator: true,
            })
        });
        let date = registry.derive(value, |style| {
            style.with_number_format(NumberFormat::Date {
                format: DATE_FORMAT.to_string(),
            })
        });
        ReportStyles { title, banner, value, fractional, date }
    }

    fn for_value(&self, value: &CellValue) -> usize {
        match value {
            CellValue::DateTime(_) => self.date,
            v if v.is_fractional() => self.fractional,
            _ => self.value,
        }
    }
}

fn header_value(part: Option<&str>) -> CellValue {
    part.map(CellValue::text).unwrap_or(CellValue::Empty)
}

/// Render `collection` onto `base`, the template sheet.
///
/// `base` is expected to carry only default styles; its cells are kept where
/// the report does not write.
pub fn render_report(
    base: Grid,
    layout: &VisibleLayout,
    collection: &Collection,
    options: &ReportOptions,
) -> RenderedSheet {
    let mut grid = base.clone();
    let mut styles = StyleRegistry::new();
    let ids = ReportStyles::register(&mut styles);
    let mut merges = Vec::new();
    let visible = layout.len() as u32;

    // Title
    grid.set_value(TITLE_ROW, 1, CellValue::text(options.title.as_str()));
    grid.set_style(TITLE_ROW, 1, ids.title);
    if visible >= 2 {
        merges.push(MergeRange {
            first_row: TITLE_ROW,
            first_col: 1,
            last_row: TITLE_ROW,
            last_col: visible,
        });
        log::debug!(
            "title merged over {}:{}",
            coord_to_a1((TITLE_ROW, 1)),
            coord_to_a1((TITLE_ROW, visible))
        );
    }

    // Two-row header
    for (col, position) in layout.iter() {
        let canonical = schema::column(position);
        grid.set_value(HEADER_TOP_ROW, col, header_value(canonical.top));
        grid.set_value(HEADER_BOTTOM_ROW, col, header_value(canonical.bottom));
    }

    // Groups and records
    let mut row = FIRST_BODY_ROW;
    for group in collection.groups().iter().filter(|g| !g.is_empty()) {
        grid.set_value(row, 1, CellValue::text(group.label()));
        for col in 1..=visible {
            grid.set_style(row, col, ids.banner);
        }
        row += 1;

        for record in group.records() {
            for (col, position) in layout.iter() {
                let value = record.get(position);
                grid.set_cell(row, col, Cell::new(value.clone()).with_style(ids.for_value(value)));
            }
            row += 1;
        }
    }
    log::debug!(
        "rendered {} records over {} visible columns",
        collection.record_count(),
        visible
    );

    // Horizontal rules over the body
    for r in FIRST_BODY_ROW..=grid.max_row {
        for col in 1..=visible {
            let current = grid.style_index(r, col);
            let ruled = styles.derive(current, CellStyle::with_horizontal_rules);
            grid.set_style(r, col, ruled);
        }
    }

    let column_widths = (1..=visible)
        .map(|col| {
            let width = match options.widths {
                WidthPolicy::Constant => DEFAULT_COLUMN_WIDTH,
                WidthPolicy::Content => content_width(&grid, col),
            };
            (col, width)
        })
        .collect();

    let changes = diff_cells(&base, &grid);

    RenderedSheet {
        grid,
        styles,
        merges,
        column_widths,
        changes,
    }
}

fn diff_cells(base: &Grid, rendered: &Grid) -> Vec<CellChange> {
    let mut changes: Vec<CellChange> = rendered
        .cells
        .iter()
        .filter_map(|(&(row, col), cell)| {
            let (value_changed, style_changed) = match base.get_cell(row, col) {
                Some(before) => (before.value != cell.value, before.style_index != cell.style_index),
                None => (!cell.value.is_empty(), cell.style_index != 0),
            };
            (value_changed || style_changed).then_some(CellChange {
                row,
                col,
                value_changed,
                style_changed,
            })
        })
        .collect();
    changes.sort_by_key(|change| (change.row, change.col));
    changes
}

fn content_width(grid: &Grid, col: u32) -> f64 {
    let longest = (1..=grid.max_row)
        .map(|r| grid.value(r, col))
        .filter(|v| !v.is_empty())
        .map(|v| v.display_value().chars().count().min(MEASURE_LIMIT))
        .max()
        .unwrap_or(0);
    (longest as f64 + WIDTH_PADDING).min(MAX_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{collect_sheet, UsedPositions};
    use crate::matcher::SourceColumnMap;
    use crate::schema::ColumnPosition;
    use crate::style::BorderLineStyle;
    use std::collections::BTreeSet;

    fn pos(p: i64) -> ColumnPosition {
        ColumnPosition::new(p).unwrap()
    }

    /// Two instruments under one label; ISIN -> 1, Name -> 5, Price -> 9.
    fn sample() -> (VisibleLayout, Collection) {
        let mut source = Grid::new();
        source.set_cell(6, 3, Cell::new_text("Investment Grade"));
        source.set_cell(7, 3, Cell::new_text("US1234567890"));
        source.set_cell(7, 4, Cell::new_text("AcmeCorp"));
        source.set_cell(7, 5, Cell::new_number(101.25));
        source.set_cell(8, 3, Cell::new_text("US0987654321"));
        source.set_cell(8, 4, Cell::new_text("Globex"));
        source.set_cell(8, 5, Cell::new_number(99.0));

        let mut map = SourceColumnMap::new();
        map.insert(3, pos(1));
        map.insert(4, pos(5));
        map.insert(5, pos(9));

        let rows: BTreeSet<u32> = [7, 8].into_iter().collect();
        let collection = collect_sheet(&source, &map, &rows);
        (VisibleLayout::from_used(collection.used()), collection)
    }

    #[test]
    fn test_title_and_merge() {
        let (layout, collection) = sample();
        let sheet = render_report(Grid::new(), &layout, &collection, &ReportOptions::default());

        assert_eq!(sheet.grid.value(1, 1), &CellValue::text(DEFAULT_TITLE));
        let title = sheet.styles.get(sheet.grid.style_index(1, 1));
        assert_eq!(title.font.size, 40);
        assert_eq!(title.font.family, "Calabria Light");
        assert!(title.font.bold);
        assert_eq!(title.text_align, TextAlign::Center);
        assert_eq!(
            sheet.merges,
            vec![MergeRange { first_row: 1, first_col: 1, last_row: 1, last_col: 3 }]
        );
    }

    #[test]
    fn test_single_visible_column_is_not_merged() {
        let mut used = UsedPositions::new();
        used.mark(pos(1));
        let layout = VisibleLayout::from_used(&used);
        let sheet = render_report(Grid::new(), &layout, &Collection::new(), &ReportOptions::default());
        assert!(sheet.merges.is_empty());
    }

    #[test]
    fn test_header_rows_use_canonical_labels_with_blank_parts() {
        let (layout, collection) = sample();
        let sheet = render_report(Grid::new(), &layout, &collection, &ReportOptions::default());

        assert_eq!(sheet.grid.value(2, 1), &CellValue::text("ISIN"));
        assert!(sheet.grid.value(3, 1).is_empty());
        assert_eq!(sheet.grid.value(2, 2), &CellValue::text("Name"));
        assert_eq!(sheet.grid.value(2, 3), &CellValue::text("Price"));
    }

    #[test]
    fn test_banner_and_record_rows() {
        let (layout, collection) = sample();
        let sheet = render_report(Grid::new(), &layout, &collection, &ReportOptions::default());
        let grid = &sheet.grid;

        assert_eq!(grid.value(4, 1), &CellValue::text("Investment Grade"));
        for col in 1..=3 {
            let banner = sheet.styles.get(grid.style_index(4, col));
            assert_eq!(banner.background, Some(Color::new(192, 192, 192)));
            assert!(banner.font.bold);
        }

        assert_eq!(grid.value(5, 1), &CellValue::text("US1234567890"));
        assert_eq!(grid.value(5, 2), &CellValue::text("AcmeCorp"));
        assert_eq!(grid.value(5, 3), &CellValue::Number(101.25));
        assert_eq!(grid.value(6, 2), &CellValue::text("Globex"));
        assert_eq!(grid.max_row, 6);

        let fractional = sheet.styles.get(grid.style_index(5, 3));
        assert_eq!(fractional.number_format.format_code(), "#,##0.0");
        assert_eq!(fractional.text_align, TextAlign::Left);
        let integral = sheet.styles.get(grid.style_index(6, 3));
        assert_eq!(integral.number_format, NumberFormat::General);
    }

    #[test]
    fn test_empty_groups_are_not_rendered() {
        let (layout, collection) = sample();
        assert!(collection.group(crate::collector::DEFAULT_GROUP).unwrap().is_empty());
        let sheet = render_report(Grid::new(), &layout, &collection, &ReportOptions::default());
        assert_ne!(sheet.grid.value(4, 1), &CellValue::text(crate::collector::DEFAULT_GROUP));
    }

    #[test]
    fn test_body_cells_get_top_and_bottom_rules() {
        let (layout, collection) = sample();
        let sheet = render_report(Grid::new(), &layout, &collection, &ReportOptions::default());

        for row in 4..=6 {
            for col in 1..=3 {
                let style = sheet.styles.get(sheet.grid.style_index(row, col));
                assert_eq!(style.borders.top.style, BorderLineStyle::Thin, "{}:{}", row, col);
                assert_eq!(style.borders.bottom.style, BorderLineStyle::Thin);
            }
        }
        let header = sheet.styles.get(sheet.grid.style_index(2, 1));
        assert_eq!(header.borders.top.style, BorderLineStyle::None);
        // banner keeps its fill under the rule
        let banner = sheet.styles.get(sheet.grid.style_index(4, 2));
        assert_eq!(banner.background, Some(Color::new(192, 192, 192)));
    }

    #[test]
    fn test_column_widths() {
        let (layout, collection) = sample();
        let constant = render_report(Grid::new(), &layout, &collection, &ReportOptions::default());
        let widths: Vec<f64> = constant.column_widths.values().copied().collect();
        assert_eq!(widths, vec![15.0, 15.0, 15.0]);

        let options = ReportOptions {
            widths: WidthPolicy::Content,
            ..ReportOptions::default()
        };
        let content = render_report(Grid::new(), &layout, &collection, &options);
        // column 1 is driven by the title, column 3 by "101.25"
        assert_eq!(content.column_widths[&1], 20.0);
        assert_eq!(content.column_widths[&2], 10.0);
        assert_eq!(content.column_widths[&3], 8.0);
    }

    #[test]
    fn test_zero_visible_columns() {
        let layout = VisibleLayout::from_used(&UsedPositions::new());
        let sheet = render_report(Grid::new(), &layout, &Collection::new(), &ReportOptions::default());
        assert!(sheet.merges.is_empty());
        assert!(sheet.column_widths.is_empty());
        assert_eq!(sheet.grid.value(1, 1), &CellValue::text(DEFAULT_TITLE));
    }

    #[test]
    fn test_template_cells_outside_the_report_survive() {
        let (layout, collection) = sample();
        let mut base = Grid::new();
        base.set_cell(30, 10, Cell::new_text("Disclaimer"));
        let sheet = render_report(base, &layout, &collection, &ReportOptions::default());
        assert_eq!(sheet.grid.value(30, 10), &CellValue::text("Disclaimer"));
        assert!(!sheet.changes.iter().any(|c| (c.row, c.col) == (30, 10)));
    }

    #[test]
    fn test_changes_list_only_touched_cells() {
        let (layout, collection) = sample();
        let mut base = Grid::new();
        base.set_cell(3, 1, Cell::new_text("stale"));
        base.set_cell(2, 1, Cell::new_text("ISIN"));
        base.set_cell(6, 2, Cell::new_text("Globex"));
        let sheet = render_report(base, &layout, &collection, &ReportOptions::default());

        let find = |row, col| sheet.changes.iter().find(|c| (c.row, c.col) == (row, col));

        // absent header part blanks a template value
        let cleared = find(3, 1).unwrap();
        assert!(cleared.value_changed && !cleared.style_changed);
        assert!(sheet.grid.value(3, 1).is_empty());

        // same text already in the template: nothing to write
        assert!(find(2, 1).is_none());

        // same value but ruled: style only
        let ruled = find(6, 2).unwrap();
        assert!(!ruled.value_changed && ruled.style_changed);

        // unset header part on an empty template cell
        assert!(find(3, 2).is_none());

        assert!(find(1, 1).unwrap().value_changed);
        let keys: Vec<(u32, u32)> = sheet.changes.iter().map(|c| (c.row, c.col)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
