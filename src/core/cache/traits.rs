//! Cache backend trait definition.

use crate::error::CacheError;

/// Storage for resolved place names, keyed by [`super::cache_key`]
pub trait PlaceCache: Send + Sync {
    /// Look up a cached place name
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a place name, replacing any previous value
    fn insert(&self, key: String, place: String) -> Result<(), CacheError>;

    /// Number of cached entries
    fn len(&self) -> Result<usize, CacheError>;

    /// Whether the cache holds no entries
    fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Write the cache to durable storage. Memory-only backends do nothing.
    fn flush(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
