//! Cached coordinate-to-place resolution.

use super::ReverseGeocoder;
use crate::core::cache::{cache_key, PlaceCache};
use crate::core::metadata::Coordinates;
use crate::error::CacheError;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Place name used whenever no name can be determined
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Resolves coordinates to place names through a cache.
///
/// A lookup lock is held from the cache check until the answer is stored, so
/// concurrent callers issue at most one request per cache key.
pub struct GeoResolver {
    geocoder: Box<dyn ReverseGeocoder>,
    cache: Box<dyn PlaceCache>,
    lookup: Mutex<()>,
    flush_on_miss: bool,
}

impl GeoResolver {
    pub fn new(geocoder: Box<dyn ReverseGeocoder>, cache: Box<dyn PlaceCache>) -> Self {
        Self {
            geocoder,
            cache,
            lookup: Mutex::new(()),
            flush_on_miss: false,
        }
    }

    /// Flush the cache after every newly stored place
    pub fn with_flush_on_miss(mut self, flush: bool) -> Self {
        self.flush_on_miss = flush;
        self
    }

    /// The backing cache
    pub fn cache(&self) -> &dyn PlaceCache {
        self.cache.as_ref()
    }

    /// Short place name for `coords`.
    ///
    /// Failed lookups return [`UNKNOWN_PLACE`] and are not cached, so the next
    /// call for the same key tries the service again.
    pub fn resolve(&self, coords: Coordinates) -> String {
        let key = cache_key(coords);
        let _guard = self.lookup.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match self.cache.get(&key) {
            Ok(Some(place)) => {
                debug!(key = %key, place = %place, "geocode cache hit");
                return place;
            }
            Ok(None) => debug!(key = %key, "geocode cache miss"),
            Err(e) => warn!(key = %key, error = %e, "geocode cache unreadable, querying service"),
        }

        let place = match self.geocoder.reverse(coords) {
            Ok(Some(address)) => place_from_address(&address),
            Ok(None) => UNKNOWN_PLACE.to_string(),
            Err(e) => {
                warn!(key = %key, error = %e, "reverse geocoding failed");
                return UNKNOWN_PLACE.to_string();
            }
        };

        if let Err(e) = self.cache.insert(key.clone(), place.clone()) {
            warn!(key = %key, error = %e, "failed to cache place");
        } else if self.flush_on_miss {
            if let Err(e) = self.cache.flush() {
                warn!(error = %e, "failed to flush geocode cache");
            }
        }

        place
    }

    /// Persist the cache
    pub fn flush(&self) -> Result<(), CacheError> {
        self.cache.flush()
    }
}

/// First comma-separated component of an address, trimmed
pub fn place_from_address(address: &str) -> String {
    let place = address.split(',').next().unwrap_or("").trim();
    if place.is_empty() {
        UNKNOWN_PLACE.to_string()
    } else {
        place.to_string()
    }
}
