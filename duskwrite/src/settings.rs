//! Persisted editor preferences.

use crate::style::DefaultStyle;
use duskcore::storage::{config_dir, read_json, write_json, RecentFiles, StorageError};
use duskcore::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SETTINGS_FILE: &str = "text_editor_settings.json";

/// Contents of `text_editor_settings.json`. Missing keys take their
/// default individually.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub font_family: String,
    pub font_size: u32,
    pub bg_color: Rgb,
    pub fg_color: Rgb,
    pub recent_files: RecentFiles,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let style = DefaultStyle::default();
        Self {
            font_family: style.family,
            font_size: style.size,
            bg_color: style.background,
            fg_color: style.foreground,
            recent_files: RecentFiles::new(),
        }
    }
}

impl EditorSettings {
    pub fn config_path() -> PathBuf {
        config_dir("duskwrite").join(SETTINGS_FILE)
    }

    /// Read settings, falling back to defaults when the file is missing or
    /// unreadable. The fallback is logged, never reported to the user.
    pub fn load(path: &Path) -> Self {
        match read_json::<EditorSettings>(path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        write_json(path, self)?;
        info!("saved settings to {}", path.display());
        Ok(())
    }

    /// Style of untagged text.
    pub fn default_style(&self) -> DefaultStyle {
        DefaultStyle {
            family: self.font_family.clone(),
            size: self.font_size,
            foreground: self.fg_color,
            background: self.bg_color,
        }
    }

    pub fn set_font(&mut self, family: &str, size: u32) {
        self.font_family = family.to_string();
        self.font_size = size;
    }

    pub fn add_recent(&mut self, path: &Path) {
        self.recent_files.add(path.to_path_buf());
    }
}
