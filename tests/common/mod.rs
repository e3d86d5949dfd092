//! Fixture builders shared by the integration tests.
//!
//! Writes minimal JPEG files carrying a real EXIF APP1 segment (big-endian TIFF
//! layout with IFD0, an Exif sub-IFD for `DateTimeOriginal` and a GPS sub-IFD), so
//! metadata extraction runs through the EXIF parser end to end.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

const TAG_ORIENTATION: u16 = 0x0112;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_GPS_IFD: u16 = 0x8825;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
const TAG_GPS_LATITUDE: u16 = 0x0002;
const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
const TAG_GPS_LONGITUDE: u16 = 0x0004;

/// A GPS position as EXIF stores it: degree/minute/second rationals plus hemisphere
#[derive(Debug, Clone, Copy)]
pub struct GpsFix {
    pub lat: [(u32, u32); 3],
    pub lat_ref: char,
    pub lon: [(u32, u32); 3],
    pub lon_ref: char,
}

/// 48°51'29.64"N 2°17'40.20"E (48.858233, 2.294500)
pub const PARIS: GpsFix = GpsFix {
    lat: [(48, 1), (51, 1), (2964, 100)],
    lat_ref: 'N',
    lon: [(2, 1), (17, 1), (4020, 100)],
    lon_ref: 'E',
};

/// 34°36'12"S 58°22'54"W (-34.603333, -58.381667)
pub const BUENOS_AIRES: GpsFix = GpsFix {
    lat: [(34, 1), (36, 1), (12, 1)],
    lat_ref: 'S',
    lon: [(58, 1), (22, 1), (54, 1)],
    lon_ref: 'W',
};

/// GPS sub-IFD contents where any tag may be left out, for incomplete fixes
#[derive(Debug, Clone, Copy, Default)]
pub struct GpsTags {
    pub lat_ref: Option<char>,
    pub lat: Option<[(u32, u32); 3]>,
    pub lon_ref: Option<char>,
    pub lon: Option<[(u32, u32); 3]>,
}

impl From<GpsFix> for GpsTags {
    fn from(fix: GpsFix) -> Self {
        Self {
            lat_ref: Some(fix.lat_ref),
            lat: Some(fix.lat),
            lon_ref: Some(fix.lon_ref),
            lon: Some(fix.lon),
        }
    }
}

/// Cache key the Paris fixture resolves under
pub const PARIS_KEY: &str = "48.858233,2.294500";

struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    fn ascii(tag: u16, text: &str) -> Self {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            kind: ASCII,
            count: data.len() as u32,
            data,
        }
    }

    fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            kind: SHORT,
            count: 1,
            data: value.to_be_bytes().to_vec(),
        }
    }

    fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: LONG,
            count: 1,
            data: value.to_be_bytes().to_vec(),
        }
    }

    fn rationals(tag: u16, parts: &[(u32, u32)]) -> Self {
        let mut data = Vec::with_capacity(parts.len() * 8);
        for (numerator, denominator) in parts {
            data.extend_from_slice(&numerator.to_be_bytes());
            data.extend_from_slice(&denominator.to_be_bytes());
        }
        Self {
            tag,
            kind: RATIONAL,
            count: parts.len() as u32,
            data,
        }
    }

    fn out_of_line_len(&self) -> usize {
        if self.data.len() > 4 {
            (self.data.len() + 1) & !1
        } else {
            0
        }
    }
}

fn ifd_len(entries: &[Entry]) -> usize {
    2 + entries.len() * 12 + 4 + entries.iter().map(Entry::out_of_line_len).sum::<usize>()
}

/// Append one IFD at `tiff.len()`, followed by the values that do not fit inline
fn write_ifd(tiff: &mut Vec<u8>, mut entries: Vec<Entry>) {
    entries.sort_by_key(|e| e.tag);

    let base = tiff.len();
    let mut data_offset = base + 2 + entries.len() * 12 + 4;
    let mut data_area = Vec::new();

    tiff.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    for entry in &entries {
        tiff.extend_from_slice(&entry.tag.to_be_bytes());
        tiff.extend_from_slice(&entry.kind.to_be_bytes());
        tiff.extend_from_slice(&entry.count.to_be_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            tiff.extend_from_slice(&inline);
        } else {
            tiff.extend_from_slice(&(data_offset as u32).to_be_bytes());
            data_area.extend_from_slice(&entry.data);
            if entry.data.len() % 2 == 1 {
                data_area.push(0);
            }
            data_offset += entry.out_of_line_len();
        }
    }
    // No next IFD
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff.extend_from_slice(&data_area);
}

/// JPEG bytes with an EXIF block holding the given capture time and position.
///
/// `label` goes into a comment segment so fixtures with equal metadata still
/// differ in content.
pub fn exif_jpeg(label: &str, date_taken: Option<&str>, gps: Option<GpsFix>) -> Vec<u8> {
    exif_jpeg_with_gps_tags(label, date_taken, gps.map(GpsTags::from))
}

/// Like [`exif_jpeg`], writing only the GPS tags that are set
pub fn exif_jpeg_with_gps_tags(
    label: &str,
    date_taken: Option<&str>,
    gps: Option<GpsTags>,
) -> Vec<u8> {
    let exif_ifd = date_taken.map(|date| vec![Entry::ascii(TAG_DATE_TIME_ORIGINAL, date)]);
    let gps_ifd = gps
        .map(|tags| {
            let mut entries = Vec::new();
            if let Some(r) = tags.lat_ref {
                entries.push(Entry::ascii(TAG_GPS_LATITUDE_REF, &r.to_string()));
            }
            if let Some(lat) = tags.lat {
                entries.push(Entry::rationals(TAG_GPS_LATITUDE, &lat));
            }
            if let Some(r) = tags.lon_ref {
                entries.push(Entry::ascii(TAG_GPS_LONGITUDE_REF, &r.to_string()));
            }
            if let Some(lon) = tags.lon {
                entries.push(Entry::rationals(TAG_GPS_LONGITUDE, &lon));
            }
            entries
        })
        .filter(|entries| !entries.is_empty());

    let mut ifd0 = vec![Entry::short(TAG_ORIENTATION, 1)];
    if exif_ifd.is_some() {
        ifd0.push(Entry::long(TAG_EXIF_IFD, 0));
    }
    if gps_ifd.is_some() {
        ifd0.push(Entry::long(TAG_GPS_IFD, 0));
    }

    let ifd0_offset = 8;
    let exif_offset = ifd0_offset + ifd_len(&ifd0);
    let gps_offset = exif_offset + exif_ifd.as_deref().map_or(0, ifd_len);
    for entry in &mut ifd0 {
        match entry.tag {
            TAG_EXIF_IFD => entry.data = (exif_offset as u32).to_be_bytes().to_vec(),
            TAG_GPS_IFD => entry.data = (gps_offset as u32).to_be_bytes().to_vec(),
            _ => {}
        }
    }

    let mut tiff = b"MM\x00\x2a".to_vec();
    tiff.extend_from_slice(&(ifd0_offset as u32).to_be_bytes());
    write_ifd(&mut tiff, ifd0);
    if let Some(entries) = exif_ifd {
        write_ifd(&mut tiff, entries);
    }
    if let Some(entries) = gps_ifd {
        write_ifd(&mut tiff, entries);
    }

    let mut app1 = b"Exif\x00\x00".to_vec();
    app1.extend_from_slice(&tiff);

    let mut jpeg = vec![0xFF, 0xD8];
    push_segment(&mut jpeg, 0xE1, &app1);
    push_segment(&mut jpeg, 0xFE, label.as_bytes());
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

fn push_segment(jpeg: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    jpeg.extend_from_slice(&[0xFF, marker]);
    jpeg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(payload);
}

/// Write an EXIF-carrying JPEG, creating parent folders
pub fn write_photo(
    dir: &Path,
    name: &str,
    date_taken: Option<&str>,
    gps: Option<GpsFix>,
) -> PathBuf {
    write_file(dir, name, &exif_jpeg(name, date_taken, gps))
}

/// Write an EXIF-carrying JPEG whose GPS block may be incomplete
pub fn write_photo_with_gps_tags(
    dir: &Path,
    name: &str,
    date_taken: Option<&str>,
    gps: GpsTags,
) -> PathBuf {
    write_file(dir, name, &exif_jpeg_with_gps_tags(name, date_taken, Some(gps)))
}

/// Write raw bytes, creating parent folders
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
