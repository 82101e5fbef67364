//! pickbook CLI - pick rows from portfolio workbooks and export a styled report
//!
//! ```bash
//! pickbook sheets portfolio.xlsx                      # list sheets, columns and row numbers
//! pickbook export portfolio.xlsx --select Bonds:7,9-12 --select Equities:5
//! pickbook settings show
//! pickbook settings set --save-path ~/Reports --columns 1,5,9
//! ```

use clap::{Parser, Subcommand};
use pickbook_lib::logging;
use pickbook_lib::{log_error, log_info};
use pickbook_lib::preview::SheetPreview;
use pickbook_lib::{
    load_sheets, run_export, ExportRequest, RowSelection, Settings, WidthPolicy,
    DEFAULT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};

/// Widest a preview column is printed.
const PREVIEW_CELL_WIDTH: usize = 24;

#[derive(Parser)]
#[command(name = "pickbook")]
#[command(about = "Export selected rows of a portfolio workbook into a styled report", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Write the unified log to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Echo log lines to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show each sheet's columns and data rows with their row numbers
    Sheets {
        /// Source workbook
        file: PathBuf,

        /// Data rows to show per sheet
        #[arg(long, default_value = "20")]
        rows: usize,
    },

    /// Export selected rows into the report template
    Export {
        /// Source workbook
        file: PathBuf,

        /// Rows to export as SHEET:ROWS, e.g. Bonds:5,7-9 (repeatable)
        #[arg(short, long)]
        select: Vec<String>,

        /// Output directory (default: save_path from settings)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Canonical columns to keep, e.g. 1,5,9 (default: from settings)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<i64>>,

        /// Template workbook (default: search bundled locations)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Size columns to their content instead of a fixed width
        #[arg(long)]
        content_width: bool,
    },

    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings
    Show,

    /// Update and save settings
    Set {
        /// Directory results are written to
        #[arg(long)]
        save_path: Option<String>,

        /// Canonical columns to keep, e.g. 1,2,3
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<i64>>,

        /// Template workbook
        #[arg(long)]
        template: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    logging::set_console(cli.verbose);
    if let Some(path) = &cli.log_file {
        if let Err(e) = logging::init_log_file(path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::install_log_bridge(level);

    let result = match cli.command {
        Commands::Sheets { file, rows } => cmd_sheets(&file, rows),

        Commands::Export {
            file,
            select,
            output_dir,
            columns,
            template,
            title,
            content_width,
        } => cmd_export(
            &cli.config,
            file,
            &select,
            output_dir,
            columns,
            template,
            title,
            content_width,
        ),

        Commands::Settings { action } => cmd_settings(&cli.config, action),
    };

    if let Err(e) = result {
        log_error!("CLI", "{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_sheets(file: &Path, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let previews = load_sheets(file)?;
    for preview in &previews {
        print_preview(preview, limit);
    }
    Ok(())
}

fn print_preview(preview: &SheetPreview, limit: usize) {
    let widths: Vec<usize> = preview
        .max_lengths
        .iter()
        .map(|&len| len.min(PREVIEW_CELL_WIDTH))
        .collect();
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                let clipped: String = cell.chars().take(width).collect();
                format!("{:<width$}", clipped, width = width)
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("== {} ({} data rows) ==", preview.name, preview.rows.len());
    println!("{:>5}  {}", "row", line(&preview.columns));
    for row in preview.rows.iter().take(limit) {
        println!("{:>5}  {}", row.sheet_row, line(&row.values));
    }
    if preview.rows.len() > limit {
        println!("  ... {} more", preview.rows.len() - limit);
    }
    println!();
}

#[allow(clippy::too_many_arguments)]
fn cmd_export(
    config: &Path,
    file: PathBuf,
    select: &[String],
    output_dir: Option<PathBuf>,
    columns: Option<Vec<i64>>,
    template: Option<PathBuf>,
    title: Option<String>,
    content_width: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(config);
    let selection = RowSelection::from_specs(select)?;

    let mut request = ExportRequest::from_settings(file, selection, &settings);
    if let Some(dir) = output_dir {
        request.output_dir = dir;
    }
    if let Some(columns) = columns {
        request.columns = columns;
    }
    if template.is_some() {
        request.template = template;
    }
    if let Some(title) = title {
        request.options.title = title;
    }
    if content_width {
        request.options.widths = WidthPolicy::Content;
    }

    let summary = run_export(&request)?;
    for name in &summary.missing_sheets {
        eprintln!("Warning: sheet '{}' not found, skipped", name);
    }
    println!(
        "Wrote {} rows in {} groups ({} columns) to {}",
        summary.records,
        summary.groups,
        summary.visible_columns,
        summary.output_path.display()
    );
    Ok(())
}

fn cmd_settings(config: &Path, action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load(config);
    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Set {
            save_path,
            columns,
            template,
        } => {
            if let Some(path) = save_path {
                settings.save_path = path;
            }
            if let Some(columns) = columns {
                settings.column_to_keep = columns;
            }
            if let Some(template) = template {
                settings.template_path = Some(template).filter(|t| !t.is_empty());
            }
            settings.save(config)?;
            log_info!("CLI", "settings saved to {}", config.display());
            println!("Settings saved to {}", config.display());
        }
    }
    Ok(())
}
