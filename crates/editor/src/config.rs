// Chunk: docs/chunks/editor_config - Editor configuration file

//! Editor configuration.
//!
//! Read once at startup from `<config_dir>/quill/config.json`. Every field
//! has a default, so a partial file only overrides what it names. A missing
//! file is the normal case; a malformed one is logged and ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Application name used for the config directory.
pub const APP_NAME: &str = "quill";

/// Config filename within the app directory.
const CONFIG_FILENAME: &str = "config.json";

/// What one level of indentation inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    /// The text of one indent unit.
    pub fn unit(self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(n.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Display width of `\t`.
    pub tab_width: usize,
    pub indent: Indent,
    /// Buffers larger than this are not saved in the background after edits.
    pub autosave_max_bytes: usize,
    /// Files with more lines are colored in two phases.
    pub large_file_lines: usize,
    /// Lines colored synchronously in the first phase.
    pub initial_color_lines: usize,
    /// Maximum number of batches on the undo stack.
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            indent: Indent::Tab,
            autosave_max_bytes: 1024 * 1024,
            large_file_lines: 5000,
            initial_color_lines: 200,
            undo_limit: 1000,
        }
    }
}

impl EditorConfig {
    /// Loads the user's config, falling back to defaults.
    pub fn load() -> Self {
        match config_file_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Loads `path`, treating a missing or malformed file as defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("{e}; using default configuration");
                Self::default()
            }
        }
    }

    /// Reads and parses `path`. Returns `Ok(None)` if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, EditorError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EditorError::io(path, e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| EditorError::Config {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Returns the path to the config file, or `None` when the platform has no
/// config directory.
pub fn config_file_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let result = EditorConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "tab_width": 8, "indent": { "spaces": 2 } }"#).unwrap();

        let config = EditorConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.indent, Indent::Spaces(2));
        assert_eq!(config.undo_limit, EditorConfig::default().undo_limit);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            EditorConfig::load_from(&path),
            Err(EditorError::Config { .. })
        ));
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
    }

    #[test]
    fn test_indent_unit() {
        assert_eq!(Indent::Tab.unit(), "\t");
        assert_eq!(Indent::Spaces(4).unit(), "    ");
        assert_eq!(Indent::Spaces(0).unit(), " ");
    }

    #[test]
    fn test_tab_indent_serializes_as_string() {
        let json = serde_json::to_string(&Indent::Tab).unwrap();
        assert_eq!(json, "\"tab\"");
    }
}
