//! Destination folder planning.

use super::types::{FolderStructure, FALLBACK_SEGMENT};
use crate::core::geo::UNKNOWN_PLACE;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Label used for a missing year or month
pub const UNKNOWN_DATE: &str = "Unknown";

#[derive(Debug, Clone, Copy)]
enum Slot {
    Place,
    Year,
    Month,
}

impl FolderStructure {
    fn slots(&self) -> Option<&'static [Slot]> {
        match self {
            FolderStructure::PlaceYearMonth => Some(&[Slot::Place, Slot::Year, Slot::Month]),
            FolderStructure::PlaceYear => Some(&[Slot::Place, Slot::Year]),
            FolderStructure::YearPlace => Some(&[Slot::Year, Slot::Place]),
            FolderStructure::YearMonthPlace => Some(&[Slot::Year, Slot::Month, Slot::Place]),
            FolderStructure::Unrecognized(_) => None,
        }
    }
}

/// Maps photo attributes to destination folders
pub struct PathPlanner;

impl PathPlanner {
    /// Ordered folder segments for a photo.
    ///
    /// Pure and deterministic; an unrecognized structure yields the single
    /// fallback segment.
    pub fn plan(structure: &FolderStructure, year: &str, month: &str, place: &str) -> Vec<String> {
        let Some(slots) = structure.slots() else {
            return vec![FALLBACK_SEGMENT.to_string()];
        };

        slots
            .iter()
            .map(|slot| match slot {
                Slot::Place => Self::sanitize_segment(place),
                Slot::Year => year.to_string(),
                Slot::Month => month.to_string(),
            })
            .collect()
    }

    /// Folder under `root` for the planned segments
    pub fn folder(
        root: &Path,
        structure: &FolderStructure,
        year: &str,
        month: &str,
        place: &str,
    ) -> PathBuf {
        Self::plan(structure, year, month, place)
            .into_iter()
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }

    /// `(year, month label)` for a capture time, `Unknown` for both when absent
    pub fn date_labels(taken: Option<NaiveDateTime>) -> (String, String) {
        match taken {
            Some(taken) => (taken.format("%Y").to_string(), Self::month_label(taken)),
            None => (UNKNOWN_DATE.to_string(), UNKNOWN_DATE.to_string()),
        }
    }

    /// Two-digit month, hyphen, English month name (e.g. `07-July`)
    pub fn month_label(taken: NaiveDateTime) -> String {
        taken.format("%m-%B").to_string()
    }

    /// Make a place name safe to use as exactly one path segment
    pub fn sanitize_segment(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
                c if c.is_control() => '-',
                c => c,
            })
            .collect();
        let cleaned = cleaned.trim();

        if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
            UNKNOWN_PLACE.to_string()
        } else {
            cleaned.to_string()
        }
    }
}
