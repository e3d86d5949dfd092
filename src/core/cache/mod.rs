//! # Cache Module
//!
//! Persists reverse-geocoding answers so a coordinate is looked up at most once.
//!
//! ## Keys
//! Coordinates are rounded to six decimals and formatted as `"lat,lon"`
//! ([`cache_key`]). Lookups and writes go through the same function, so two
//! positions within roughly 0.1 m share one entry.
//!
//! ## Backends
//! - `JsonFileCache` - a JSON object on disk, loaded once and flushed wholesale
//! - `InMemoryCache` - for testing

mod json;
mod memory;
mod traits;

pub use json::JsonFileCache;
pub use memory::InMemoryCache;
pub use traits::PlaceCache;

use crate::core::metadata::Coordinates;

/// Cache key for a coordinate pair: six decimals each, comma separated
pub fn cache_key(coords: Coordinates) -> String {
    format!("{:.6},{:.6}", coords.latitude, coords.longitude)
}
