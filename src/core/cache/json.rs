//! JSON file cache backend.
//!
//! The file is a single JSON object mapping `"lat,lon"` keys to place names.
//! It is read once when opened and rewritten wholesale on [`PlaceCache::flush`].

use super::PlaceCache;
use crate::error::CacheError;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Place cache persisted as a JSON object
pub struct JsonFileCache {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileCache {
    /// Open the cache at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty cache; the problem is
    /// logged and the file is replaced on the next flush.
    pub fn open(path: &Path) -> Self {
        let entries = match Self::load(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "starting with an empty geocode cache");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "geocode cache opened");

        Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, CacheError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|e| CacheError::Serialize(e.to_string()))
    }
}

impl PlaceCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn insert(&self, key: String, place: String) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key, place);
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.len())
    }

    fn flush(&self) -> Result<(), CacheError> {
        let json = {
            let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
            serde_json::to_string_pretty(&*entries)
                .map_err(|e| CacheError::Serialize(e.to_string()))?
        };

        let write_error = |reason: String| CacheError::Write {
            path: self.path.clone(),
            reason,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| write_error(e.to_string()))?;

        // Write beside the target and rename, so a crash never leaves half a file
        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| write_error(e.to_string()))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| write_error(e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| write_error(e.error.to_string()))?;

        debug!(path = %self.path.display(), "geocode cache flushed");
        Ok(())
    }
}
