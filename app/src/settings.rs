//! FILENAME: app/src/settings.rs
// PURPOSE: Output directory and kept-column preferences, persisted as JSON.
// CONTEXT: The file is forgiving on load (missing or broken files fall back to
// defaults, missing keys take their own defaults) and strict on save.

use crate::error::SettingsError;
use crate::{log_debug, log_warn};
use directories::{BaseDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_COLUMNS: [i64; 7] = [1, 2, 3, 4, 5, 6, 7];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// 1-based canonical positions to keep in the report.
    #[serde(default = "default_columns")]
    pub column_to_keep: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,
}

/// The user's Desktop, or `~/Desktop` when the platform has no such folder.
pub fn default_save_path() -> String {
    let desktop = UserDirs::new()
        .and_then(|dirs| dirs.desktop_dir().map(Path::to_path_buf))
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join("Desktop")))
        .unwrap_or_else(|| PathBuf::from("Desktop"));
    desktop.to_string_lossy().into_owned()
}

fn default_columns() -> Vec<i64> {
    DEFAULT_COLUMNS.to_vec()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            save_path: default_save_path(),
            column_to_keep: default_columns(),
            template_path: None,
        }
    }
}

impl Settings {
    /// Read settings from `path`. Never fails.
    pub fn load(path: &Path) -> Settings {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log_debug!("SETTINGS", "no settings at {}: {}", path.display(), e);
                return Settings::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                log_warn!("SETTINGS", "ignoring unreadable {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.save_path.trim().is_empty() {
            return Err(SettingsError::EmptySavePath);
        }
        if self.column_to_keep.is_empty() {
            return Err(SettingsError::NoColumns);
        }
        Ok(())
    }

    /// Validate, then write to `path`. An invalid value leaves the file untouched.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;
        let mut normalized = self.clone();
        normalized.save_path = self.save_path.trim().to_string();

        let json = serde_json::to_string_pretty(&normalized)?;
        persistence::write_atomic(path, json.as_bytes()).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log_debug!("SETTINGS", "saved {}", path.display());
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.save_path)
    }

    pub fn template(&self) -> Option<PathBuf> {
        self.template_path.as_ref().map(PathBuf::from)
    }
}
