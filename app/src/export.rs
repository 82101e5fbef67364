//! FILENAME: app/src/export.rs
// PURPOSE: The export operation: selected rows of a source workbook into the report.
// CONTEXT: Runs the engine pipeline over every sheet of the source workbook,
// writes the result into a copy of the template (its first sheet) and saves
// it as `<output dir>/<source stem>_result.xlsx` atomically. The selection is
// checked before any file is opened.

use crate::error::ExportError;
use crate::selection::RowSelection;
use crate::settings::Settings;
use crate::{log_debug, log_enter_info, log_exit_info, log_info, log_warn};
use engine::collector::{collect_sheet, Collection};
use engine::columns::{select_columns, ColumnSelection};
use engine::layout::VisibleLayout;
use engine::matcher::match_columns;
use engine::render::{render_report, ReportOptions};
use persistence::{ReportTemplate, Workbook};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const RESULT_SUFFIX: &str = "_result";
pub const RESULT_EXTENSION: &str = "xlsx";

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source: PathBuf,
    pub selection: RowSelection,
    /// 1-based canonical positions to keep.
    pub columns: Vec<i64>,
    pub output_dir: PathBuf,
    /// Explicit template; `None` searches the default locations.
    pub template: Option<PathBuf>,
    pub options: ReportOptions,
}

impl ExportRequest {
    /// A request using the stored output directory, columns and template.
    pub fn from_settings(source: PathBuf, selection: RowSelection, settings: &Settings) -> Self {
        ExportRequest {
            source,
            selection,
            columns: settings.column_to_keep.clone(),
            output_dir: settings.output_dir(),
            template: settings.template(),
            options: ReportOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub output_path: PathBuf,
    /// Groups that made it into the report (non-empty ones).
    pub groups: usize,
    pub records: usize,
    pub visible_columns: usize,
    /// Selected sheet names that the source workbook does not contain.
    pub missing_sheets: Vec<String>,
}

/// `<output_dir>/<source stem>_result.xlsx`
pub fn result_path(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}{}.{}", stem, RESULT_SUFFIX, RESULT_EXTENSION))
}

/// Collect the selected rows of every sheet, in workbook order.
/// Sheets without a selection are still scanned so their labels fix the group
/// order. Returns the merged collection and the selected sheets that were not
/// found.
pub fn collect_workbook(
    workbook: &Workbook,
    selection: &RowSelection,
    columns: &ColumnSelection,
) -> (Collection, Vec<String>) {
    let mut collection = Collection::new();
    let none = BTreeSet::new();

    for sheet in &workbook.sheets {
        let rows = selection.rows_for(&sheet.name).unwrap_or(&none);
        let grid = sheet.to_grid();
        let map = match_columns(&grid, columns.lookup());
        log_debug!(
            "EXPORT",
            "sheet '{}': {} matched columns, {} selected rows",
            sheet.name,
            map.len(),
            rows.len()
        );
        collection.absorb(collect_sheet(&grid, &map, rows));
    }

    let missing: Vec<String> = selection
        .sheets()
        .filter(|(name, rows)| !rows.is_empty() && workbook.sheet(name).is_err())
        .map(|(name, _)| name.to_string())
        .collect();
    for name in &missing {
        log_warn!("EXPORT", "selected sheet '{}' is not in the workbook", name);
    }

    (collection, missing)
}

pub fn run_export(request: &ExportRequest) -> Result<ExportSummary, ExportError> {
    log_enter_info!("EXPORT", "run_export", "source={}", request.source.display());

    let result = export(request);

    match &result {
        Ok(summary) => log_exit_info!("EXPORT", "run_export", "wrote {}", summary.output_path.display()),
        Err(e) => log_exit_info!("EXPORT", "run_export", "failed: {}", e),
    }
    result
}

fn export(request: &ExportRequest) -> Result<ExportSummary, ExportError> {
    if request.selection.is_empty() {
        return Err(ExportError::EmptySelection);
    }

    let source = persistence::load_xlsx(&request.source)
        .map_err(|e| ExportError::load(&request.source, e))?;

    let template_path = crate::template::resolve_template(request.template.as_deref())?;
    let mut template =
        ReportTemplate::open(&template_path).map_err(|e| ExportError::load(&template_path, e))?;

    let columns = select_columns(&request.columns);
    let (collection, missing_sheets) = collect_workbook(&source, &request.selection, &columns);
    let layout = VisibleLayout::from_used(collection.used());

    let rendered = render_report(
        template.base_grid().clone(),
        &layout,
        &collection,
        &request.options,
    );

    let output_path = result_path(&request.source, &request.output_dir);
    template
        .apply(&rendered)
        .and_then(|_| template.save(&output_path))
        .map_err(|source| ExportError::PersistFailure {
            path: output_path.clone(),
            source,
        })?;

    let summary = ExportSummary {
        output_path,
        groups: collection.groups().iter().filter(|g| !g.is_empty()).count(),
        records: collection.record_count(),
        visible_columns: layout.len(),
        missing_sheets,
    };
    log_info!(
        "EXPORT",
        "wrote {} records in {} groups to '{}' of {}",
        summary.records,
        summary.groups,
        template.sheet_name(),
        summary.output_path.display()
    );
    Ok(summary)
}
