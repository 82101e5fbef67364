//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for pickbook integration tests.

#![allow(dead_code)]

use persistence::{load_xlsx, Sheet};
use pickbook_lib::{ExportRequest, ReportOptions, RowSelection};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A cell to place in a fixture sheet, 1-based like the sheets themselves.
pub enum Value {
    Text(&'static str),
    Number(f64),
}

pub use Value::{Number, Text};

/// Test harness: a temp directory holding source workbooks, a template and an
/// output directory.
pub struct TestHarness {
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        TestHarness {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path("out")
    }

    /// Write a workbook with the given sheets of (row, col, value) cells.
    pub fn write_workbook(&self, name: &str, sheets: &[(&str, Vec<(u32, u32, Value)>)]) -> PathBuf {
        let path = self.path(name);
        let mut workbook = Workbook::new();
        for (sheet_name, cells) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*sheet_name).unwrap();
            write_cells(worksheet, cells);
        }
        workbook.save(&path).unwrap();
        path
    }

    /// An empty single-sheet template.
    pub fn write_template(&self) -> PathBuf {
        self.write_workbook("template.xlsx", &[("Portfolio", vec![])])
    }

    /// A house template: a red italic disclaimer at A31, a tall title row and
    /// a second "Notes" sheet.
    pub fn write_styled_template(&self) -> PathBuf {
        let path = self.path("house.xlsx");
        let mut workbook = Workbook::new();
        let portfolio = workbook.add_worksheet();
        portfolio.set_name("Portfolio").unwrap();
        portfolio.set_row_height(0, 60).unwrap();
        let disclaimer = Format::new().set_italic().set_font_color(Color::RGB(0xFF0000));
        portfolio
            .write_string_with_format(30, 0, "For professional investors only", &disclaimer)
            .unwrap();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "Prices as of close").unwrap();
        workbook.save(&path).unwrap();
        path
    }

    /// The "Bonds" sheet used across the export tests:
    ///   row 2/3 headers: C ISIN, D Name, E Price/MID
    ///   row 6 label "Investment Grade", rows 7-8 two bonds
    pub fn write_bonds_source(&self) -> PathBuf {
        self.write_workbook("portfolio.xlsx", &[("Bonds", bonds_cells())])
    }

    /// A request against `source` using the harness template and output dir.
    pub fn request(&self, source: &Path, selection: RowSelection, columns: &[i64]) -> ExportRequest {
        ExportRequest {
            source: source.to_path_buf(),
            selection,
            columns: columns.to_vec(),
            output_dir: self.output_dir(),
            template: Some(self.write_template()),
            options: ReportOptions::default(),
        }
    }

    /// Load the single report sheet of an output file.
    pub fn read_report(&self, path: &Path) -> Sheet {
        let workbook = load_xlsx(path).unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        workbook.sheets.into_iter().next().unwrap()
    }

    /// Open an output file with its formatting.
    pub fn read_book(&self, path: &Path) -> umya_spreadsheet::Spreadsheet {
        umya_spreadsheet::reader::xlsx::read(path).unwrap()
    }
}

pub fn bonds_cells() -> Vec<(u32, u32, Value)> {
    vec![
        (2, 3, Text("ISIN")),
        (2, 4, Text("Name")),
        (2, 5, Text("Price")),
        (3, 5, Text("MID")),
        (6, 3, Text("Investment Grade")),
        (7, 3, Text("US1234567890")),
        (7, 4, Text("AcmeCorp")),
        (7, 5, Number(101.25)),
        (8, 3, Text("US0987654321")),
        (8, 4, Text("Globex")),
        (8, 5, Number(99.5)),
    ]
}

pub fn selection(specs: &[&str]) -> RowSelection {
    RowSelection::from_specs(specs).unwrap()
}

fn write_cells(worksheet: &mut Worksheet, cells: &[(u32, u32, Value)]) {
    for (row, col, value) in cells {
        let (r, c) = (row - 1, (col - 1) as u16);
        match value {
            Value::Text(s) => {
                worksheet.write_string(r, c, *s).unwrap();
            }
            Value::Number(n) => {
                worksheet.write_number(r, c, *n).unwrap();
            }
        }
    }
}
