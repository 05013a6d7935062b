//! Extension allow-list configuration.
//!
//! The only persisted setting is the comma-separated list of file extensions
//! that qualify an archive entry for display. It is stored as a small JSON
//! file in the user's config directory and loaded tolerantly: a missing or
//! unreadable file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const PROGRAM_NAME: &str = "ziptext";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Extensions shown by default when no setting has been saved.
pub const DEFAULT_EXTENSIONS: &str = "txt,xml,py,sql,json,kt,kts,java,log,bat,md,gitignore,pro";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub extensions: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.to_string(),
        }
    }
}

/// Settings file location, under the platform config directory.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROGRAM_NAME)
        .join(SETTINGS_FILE_NAME)
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// absent or malformed.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!("ignoring malformed settings file {}: {err}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Normalize and persist the settings, creating parent directories as
    /// needed. The stored list is lower-cased with whitespace stripped.
    pub fn save(&self, path: &Path) -> Result<()> {
        let normalized = Self {
            extensions: normalize_list(&self.extensions),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&normalized)?;
        fs::write(path, raw).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

fn normalize_list(raw: &str) -> String {
    raw.to_lowercase().replace(char::is_whitespace, "")
}

/// Parsed extension allow-list.
///
/// Matching follows the original rule: the extension is the substring after
/// the last `.` in the file name, compared case-insensitively. A name without
/// a dot has the empty extension, which only matches when the list contains
/// an explicit empty entry.
#[derive(Debug, Clone)]
pub struct ExtensionList(Vec<String>);

impl ExtensionList {
    pub fn parse(raw: &str) -> Self {
        let entries = normalize_list(raw)
            .split(',')
            .map(str::to_string)
            .collect();
        Self(entries)
    }

    pub fn is_allowed(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);
        self.0.iter().any(|e| e == &ext)
    }
}

/// Substring after the last `.`, lower-cased; empty when there is no dot.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}
