//! FILENAME: app/src/lib.rs
// PURPOSE: Library side of the pickbook tool.
// CONTEXT: Everything the CLI does lives here so integration tests can drive
// it directly: previews, row selection, settings, template lookup, export.

pub mod error;
pub mod export;
pub mod logging;
pub mod preview;
pub mod selection;
pub mod settings;
pub mod template;

pub use error::{ExportError, SelectionError, SettingsError};
pub use export::{collect_workbook, result_path, run_export, ExportRequest, ExportSummary};
pub use preview::{load_sheets, PreviewRow, SheetPreview};
pub use selection::RowSelection;
pub use settings::{Settings, DEFAULT_CONFIG_FILE};
pub use template::resolve_template;

pub use engine::render::{ReportOptions, WidthPolicy};
