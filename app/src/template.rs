//! FILENAME: app/src/template.rs
// PURPOSE: Locates the report template workbook.

use crate::error::ExportError;
use crate::log_debug;
use std::path::{Path, PathBuf};

pub const TEMPLATE_ENV: &str = "PICKBOOK_TEMPLATE";
pub const TEMPLATE_FILE: &str = "template.xlsx";

/// Places searched when no template was named explicitly, in order:
/// `$PICKBOOK_TEMPLATE`, next to the executable, the source tree's assets.
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = std::env::var_os(TEMPLATE_ENV).filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(path));
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(TEMPLATE_FILE));
        candidates.push(dir.join("assets").join(TEMPLATE_FILE));
    }
    candidates.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(TEMPLATE_FILE));

    candidates
}

/// An explicit template must exist; otherwise the first existing default wins.
pub fn resolve_template(explicit: Option<&Path>) -> Result<PathBuf, ExportError> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => default_candidates(),
    };

    for candidate in &candidates {
        if candidate.is_file() {
            log_debug!("TEMPLATE", "using {}", candidate.display());
            return Ok(candidate.clone());
        }
    }

    Err(ExportError::TemplateMissing {
        searched: candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
