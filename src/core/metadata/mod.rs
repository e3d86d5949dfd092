//! # Metadata Module
//!
//! Extracts the capture timestamp and GPS position from a photo's EXIF block.
//!
//! A file without a readable EXIF block is a normal outcome, reported as `None`
//! rather than an error. Inside a readable block, a missing or malformed date or
//! GPS tag simply leaves that field empty.

use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// EXIF `DateTimeOriginal` layout
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// A decimal latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Metadata read from a photo that carries an EXIF block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Original capture date/time
    pub date_taken: Option<NaiveDateTime>,
    /// Decimal GPS position
    pub coordinates: Option<Coordinates>,
}

/// Read EXIF metadata from a photo file.
///
/// Returns `None` when the file cannot be opened or holds no decodable EXIF.
pub fn extract_metadata(path: &Path) -> Option<PhotoMetadata> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(&file);
    let exif = match Reader::new().read_from_container(&mut bufreader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no EXIF metadata");
            return None;
        }
    };

    Some(PhotoMetadata {
        date_taken: extract_timestamp(&exif),
        coordinates: extract_gps(&exif),
    })
}

/// Capture time from `DateTimeOriginal`
pub fn extract_timestamp(exif: &Exif) -> Option<NaiveDateTime> {
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    parse_exif_datetime(&get_string_value(&field.value)?)
}

/// Decimal coordinates from the GPS IFD.
///
/// Both the rational triples and both hemisphere references must be present.
pub fn extract_gps(exif: &Exif) -> Option<Coordinates> {
    let lat = read_dms(exif, Tag::GPSLatitude)?;
    let lat_ref = read_ref(exif, Tag::GPSLatitudeRef)?;
    let lon = read_dms(exif, Tag::GPSLongitude)?;
    let lon_ref = read_ref(exif, Tag::GPSLongitudeRef)?;

    let latitude = dms_to_decimal(lat, lat_ref == "S");
    let longitude = dms_to_decimal(lon, lon_ref == "W");

    if latitude.is_finite() && longitude.is_finite() {
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    }
}

/// Parse the fixed EXIF layout `YYYY:MM:DD HH:MM:SS`
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), EXIF_DATETIME_FORMAT).ok()
}

/// `deg + min/60 + sec/3600`, negated for the southern/western hemisphere
pub fn dms_to_decimal((degrees, minutes, seconds): (f64, f64, f64), negate: bool) -> f64 {
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    if negate {
        -decimal
    } else {
        decimal
    }
}

fn read_dms(exif: &Exif, tag: Tag) -> Option<(f64, f64, f64)> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Rational(ref parts) if parts.len() >= 3 => {
            Some((parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64()))
        }
        _ => None,
    }
}

fn read_ref(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    get_string_value(&field.value).map(|s| s.to_uppercase())
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}
