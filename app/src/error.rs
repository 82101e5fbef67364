//! FILENAME: app/src/error.rs
// PURPOSE: Error types surfaced by the export pipeline and its collaborators.

use persistence::PersistenceError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Save path cannot be empty")]
    EmptySavePath,

    #[error("At least one column must be selected")]
    NoColumns,

    #[error("Failed to write settings {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Invalid selection '{0}': expected SHEET:ROWS, e.g. Bonds:5,7-9")]
    MissingSheet(String),

    #[error("Invalid row '{row}' in selection '{spec}'")]
    InvalidRow { spec: String, row: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to load {}: {source}", path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },

    #[error("No rows selected")]
    EmptySelection,

    #[error("Template not found (searched: {searched})")]
    TemplateMissing { searched: String },

    #[error("Failed to write {}: {source}", path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl ExportError {
    /// Maps a load error, keeping a missing file distinct from an unreadable one.
    pub(crate) fn load(path: &std::path::Path, source: PersistenceError) -> Self {
        match source {
            PersistenceError::FileNotFound(missing) => ExportError::FileNotFound(missing),
            source => ExportError::LoadFailure {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
