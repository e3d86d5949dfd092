//! Persisted run preferences.
//!
//! The last used structure, mode and folders are stored as a small JSON object so
//! the next run can offer them again.

use crate::core::organize::{FolderStructure, TransferMode};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const APP_DIR: &str = "picplace";
const CONFIG_FILE: &str = "picplace_config.json";
const CACHE_FILE: &str = "picplace_geocache.json";

/// Preferences remembered between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub structure: FolderStructure,
    pub mode: TransferMode,
    #[serde(rename = "last_src_folder")]
    pub last_source_folder: String,
    #[serde(rename = "different_folder")]
    pub different_destination: bool,
    #[serde(rename = "last_dst_folder")]
    pub last_destination_folder: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            structure: FolderStructure::PlaceYearMonth,
            mode: TransferMode::Move,
            last_source_folder: String::new(),
            different_destination: false,
            last_destination_folder: String::new(),
        }
    }
}

impl RunConfig {
    /// Load from `path`, falling back to defaults when the file is absent or unusable
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "ignoring saved configuration");
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write to `path` as pretty JSON, creating parent folders
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        let write_error = |reason: String| ConfigError::Write {
            path: path.to_path_buf(),
            reason,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| write_error(e.to_string()))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| write_error(e.to_string()))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| write_error(e.to_string()))?;
        temp.persist(path)
            .map_err(|e| write_error(e.error.to_string()))?;

        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// `<config dir>/picplace/picplace_config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// `<cache dir>/picplace/picplace_geocache.json`
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CACHE_FILE)
}
