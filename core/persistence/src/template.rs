//! FILENAME: core/persistence/src/template.rs
//! PURPOSE: Writes a rendered report into a copy of the template workbook.
//! CONTEXT: The template is opened with umya-spreadsheet so that everything
//! the report does not touch survives: other sheets, formatting, row heights,
//! merges and page setup. Only the cells listed in `RenderedSheet::changes`
//! are written, and their existing style is layered on rather than replaced.
//! Cell values of the report sheet are also read through calamine so the
//! renderer sees the template exactly like a source sheet.

use crate::{atomic, load_xlsx, PersistenceError};
use engine::cell::CellValue;
use engine::coord::{coord_to_a1, index_to_col};
use engine::grid::Grid;
use engine::render::RenderedSheet;
use engine::style::{BorderLineStyle, BorderStyle, CellStyle, Color, FontStyle, TextAlign, VerticalAlign};
use std::io::Cursor;
use std::path::Path;
use umya_spreadsheet::{Border, HorizontalAlignmentValues, Spreadsheet, VerticalAlignmentValues, Worksheet};

/// A template workbook opened for one report. The report goes onto its first
/// sheet.
pub struct ReportTemplate {
    book: Spreadsheet,
    sheet_name: String,
    base: Grid,
}

impl ReportTemplate {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let values = load_xlsx(path)?;
        let sheet = values.active()?;

        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| PersistenceError::Template(e.to_string()))?;
        if book.get_sheet_by_name(&sheet.name).is_none() {
            return Err(PersistenceError::SheetNotFound(sheet.name.clone()));
        }

        log::debug!("template {} -> sheet '{}'", path.display(), sheet.name);
        Ok(ReportTemplate {
            book,
            sheet_name: sheet.name.clone(),
            base: sheet.to_grid(),
        })
    }

    /// Name of the sheet the report is written to.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Cached values of the report sheet, the base grid for rendering.
    pub fn base_grid(&self) -> &Grid {
        &self.base
    }

    /// Write the report's changed cells, merges and column widths.
    pub fn apply(&mut self, report: &RenderedSheet) -> Result<(), PersistenceError> {
        let sheet = self
            .book
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| PersistenceError::SheetNotFound(self.sheet_name.clone()))?;

        for change in &report.changes {
            let (row, col) = (change.row, change.col);
            let value = report.grid.value(row, col);

            if change.value_changed {
                write_value(sheet.get_cell_mut((col, row)), value);
            }
            if change.style_changed {
                let style = report.styles.get(report.grid.style_index(row, col));
                layer_style(sheet.get_cell_mut((col, row)).get_style_mut(), style);
            }
        }

        for merge in &report.merges {
            let range = format!(
                "{}:{}",
                coord_to_a1((merge.first_row, merge.first_col)),
                coord_to_a1((merge.last_row, merge.last_col))
            );
            if !has_merge(sheet, &range) {
                sheet.add_merge_cells(range);
            }
        }

        for (&col, &width) in &report.column_widths {
            sheet.get_column_dimension_mut(&index_to_col(col)).set_width(width);
        }

        log::debug!(
            "applied {} cells, {} merges to '{}'",
            report.changes.len(),
            report.merges.len(),
            self.sheet_name
        );
        Ok(())
    }

    /// Serializes the whole workbook into XLSX bytes.
    pub fn to_buffer(&self) -> Result<Vec<u8>, PersistenceError> {
        let mut cursor = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, &mut cursor)
            .map_err(|e| PersistenceError::Template(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    /// Writes the workbook to `path`. The file is replaced atomically, so a
    /// failed save never leaves a truncated workbook behind.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let bytes = self.to_buffer()?;
        atomic::write_atomic(path, &bytes)?;
        log::debug!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

fn has_merge(sheet: &Worksheet, range: &str) -> bool {
    sheet
        .get_merge_cells()
        .iter()
        .any(|existing| existing.get_range() == range)
}

fn write_value(cell: &mut umya_spreadsheet::Cell, value: &CellValue) {
    match value {
        CellValue::Empty => {
            cell.set_blank();
        }
        CellValue::Number(n) | CellValue::DateTime(n) => {
            cell.set_value_number(*n);
        }
        CellValue::Text(s) | CellValue::Error(s) => {
            cell.set_value_string(s.clone());
        }
        CellValue::Boolean(b) => {
            cell.set_value_bool(*b);
        }
    }
}

/// Set what `style` specifies on top of the cell's existing formatting.
/// Properties left at their defaults keep whatever the template had.
fn layer_style(target: &mut umya_spreadsheet::Style, style: &CellStyle) {
    let default_font = FontStyle::default();
    let font = target.get_font_mut();
    if style.font.bold {
        font.set_bold(true);
    }
    if style.font.size != default_font.size {
        font.set_size(style.font.size as f64);
    }
    if style.font.family != default_font.family {
        font.set_name(style.font.family.clone());
    }
    if style.font.color != Color::black() {
        font.get_color_mut().set_argb(style.font.color.to_argb_hex());
    }

    if let Some(background) = &style.background {
        target.set_background_color(background.to_argb_hex());
    }

    // Alignment is written as a pair once either axis is set.
    if style.text_align != TextAlign::General || style.vertical_align != VerticalAlign::Bottom {
        let alignment = target.get_alignment_mut();
        alignment.set_horizontal(match style.text_align {
            TextAlign::General => HorizontalAlignmentValues::General,
            TextAlign::Left => HorizontalAlignmentValues::Left,
            TextAlign::Center => HorizontalAlignmentValues::Center,
            TextAlign::Right => HorizontalAlignmentValues::Right,
        });
        alignment.set_vertical(match style.vertical_align {
            VerticalAlign::Top => VerticalAlignmentValues::Top,
            VerticalAlign::Middle => VerticalAlignmentValues::Center,
            VerticalAlign::Bottom => VerticalAlignmentValues::Bottom,
        });
    }

    let code = style.number_format.format_code();
    if !code.is_empty() {
        target.get_number_format_mut().set_format_code(code);
    }

    let borders = target.get_borders_mut();
    layer_border(borders.get_top_mut(), &style.borders.top);
    layer_border(borders.get_bottom_mut(), &style.borders.bottom);
}

fn layer_border(target: &mut Border, border: &BorderStyle) {
    match border.style {
        BorderLineStyle::None => {}
        BorderLineStyle::Thin => {
            target.set_border_style(Border::BORDER_THIN);
            target.get_color_mut().set_argb(border.color.to_argb_hex());
        }
    }
}
