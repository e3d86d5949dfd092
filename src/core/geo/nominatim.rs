//! Reverse geocoding against the OpenStreetMap Nominatim API.

use super::ReverseGeocoder;
use crate::core::metadata::Coordinates;
use crate::error::GeocodeError;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Public Nominatim reverse endpoint
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";

/// Upper bound for a single lookup
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Nominatim's usage policy requires an identifying user agent
const USER_AGENT: &str = "picplace_organizer";

/// Blocking Nominatim client
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

impl ReverseResponse {
    fn into_address(self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        self.display_name.filter(|name| !name.trim().is_empty())
    }
}

impl NominatimGeocoder {
    /// Client for the public endpoint with the default timeout
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_config(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    /// Client for a custom endpoint (e.g. a self-hosted Nominatim)
    pub fn with_config(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GeocodeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            language: "en".to_string(),
        })
    }
}

fn request_error(e: reqwest::Error) -> GeocodeError {
    if e.is_timeout() {
        GeocodeError::Timeout
    } else {
        GeocodeError::Request(e.to_string())
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn reverse(&self, coords: Coordinates) -> Result<Option<String>, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?;

        let body: ReverseResponse = response
            .json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        Ok(body.into_address())
    }
}
