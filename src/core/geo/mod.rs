//! # Geo Module
//!
//! Turns GPS coordinates into short place names.
//!
//! [`GeoResolver`] sits in front of a [`ReverseGeocoder`] and a
//! [`PlaceCache`](crate::core::cache::PlaceCache): cached coordinates never reach
//! the network, and only answered lookups are cached.

mod nominatim;
mod resolver;

pub use nominatim::{NominatimGeocoder, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use resolver::{place_from_address, GeoResolver, UNKNOWN_PLACE};

use crate::core::metadata::Coordinates;
use crate::error::GeocodeError;

/// A reverse-geocoding service
pub trait ReverseGeocoder: Send + Sync {
    /// Full address for `coords`, or `None` when the service has no address there
    fn reverse(&self, coords: Coordinates) -> Result<Option<String>, GeocodeError>;
}

/// Geocoder that never answers, for offline runs
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGeocoder;

impl ReverseGeocoder for OfflineGeocoder {
    fn reverse(&self, _coords: Coordinates) -> Result<Option<String>, GeocodeError> {
        Err(GeocodeError::Offline)
    }
}
