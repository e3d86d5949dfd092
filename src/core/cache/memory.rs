//! In-memory cache backend for testing.

use super::PlaceCache;
use crate::error::CacheError;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory place cache
///
/// Useful for testing and for runs that should not touch the cache file.
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryCache {
    /// Create an empty in-memory cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a cache pre-filled with entries
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceCache for InMemoryCache {
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
}
