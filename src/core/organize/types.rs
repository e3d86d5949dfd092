//! Types for the organize module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Bucket for the non-canonical members of duplicate groups
pub const DUPLICATES_BUCKET: &str = "_PicPlace_Duplicates";

/// Bucket for photos without an EXIF block
pub const NO_METADATA_BUCKET: &str = "_PicPlace_NoMetadata";

/// Single segment used when the folder structure is not recognized
pub const FALLBACK_SEGMENT: &str = "Unknown";

/// Folder structure options for organization.
///
/// Parsing never fails: an unknown label becomes [`FolderStructure::Unrecognized`],
/// which plans every photo into the [`FALLBACK_SEGMENT`] folder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FolderStructure {
    /// Place/Year/Month (e.g., Paris/2023/07-July/)
    #[default]
    PlaceYearMonth,
    /// Place/Year (e.g., Paris/2023/)
    PlaceYear,
    /// Year/Place (e.g., 2023/Paris/)
    YearPlace,
    /// Year/Month/Place (e.g., 2023/07-July/Paris/)
    YearMonthPlace,
    /// Any other label, kept verbatim
    Unrecognized(String),
}

impl FolderStructure {
    /// The four supported structures
    pub const ALL: [FolderStructure; 4] = [
        FolderStructure::PlaceYearMonth,
        FolderStructure::PlaceYear,
        FolderStructure::YearPlace,
        FolderStructure::YearMonthPlace,
    ];

    /// Display label, also used when persisting
    pub fn label(&self) -> &str {
        match self {
            FolderStructure::PlaceYearMonth => "Place/Year/Month",
            FolderStructure::PlaceYear => "Place/Year",
            FolderStructure::YearPlace => "Year/Place",
            FolderStructure::YearMonthPlace => "Year/Month/Place",
            FolderStructure::Unrecognized(label) => label,
        }
    }
}

impl From<&str> for FolderStructure {
    fn from(label: &str) -> Self {
        // Spanish labels come from configuration files written by earlier releases
        match label.trim().to_lowercase().as_str() {
            "place/year/month" | "place_year_month" | "lugar/año/mes" => {
                FolderStructure::PlaceYearMonth
            }
            "place/year" | "place_year" | "lugar/año" => FolderStructure::PlaceYear,
            "year/place" | "year_place" | "año/lugar" => FolderStructure::YearPlace,
            "year/month/place" | "year_month_place" | "año/mes/lugar" => {
                FolderStructure::YearMonthPlace
            }
            _ => FolderStructure::Unrecognized(label.to_string()),
        }
    }
}

impl From<String> for FolderStructure {
    fn from(label: String) -> Self {
        FolderStructure::from(label.as_str())
    }
}

impl From<FolderStructure> for String {
    fn from(structure: FolderStructure) -> Self {
        structure.label().to_string()
    }
}

impl fmt::Display for FolderStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether photos are duplicated or relocated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Copy files to destination (keep originals)
    #[serde(alias = "Copy", alias = "Copiar")]
    Copy,
    /// Move files to destination
    #[default]
    #[serde(alias = "Move", alias = "Mover")]
    Move,
}

impl FromStr for TransferMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "copy" | "copiar" => Ok(TransferMode::Copy),
            "move" | "mover" => Ok(TransferMode::Move),
            other => Err(format!("unknown transfer mode '{}' (expected copy or move)", other)),
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Copy => f.write_str("copy"),
            TransferMode::Move => f.write_str("move"),
        }
    }
}

/// One organize invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub structure: FolderStructure,
    pub mode: TransferMode,
}

impl OrganizeRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        structure: FolderStructure,
        mode: TransferMode,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            structure,
            mode,
        }
    }
}

/// A candidate that could not be organized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregate statistics of one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// Distinct-content candidates found by the scan
    pub total: usize,
    /// Candidates transferred successfully
    pub organized: usize,
    /// Candidates that failed to transfer
    pub errors: usize,
    /// Groups of byte-identical files
    pub duplicate_groups: usize,
    /// Organized candidates that went to the no-metadata bucket
    pub no_metadata: usize,
    /// Redundant duplicates moved or copied into the duplicates bucket
    pub duplicates_transferred: usize,
    /// Supported files skipped because they could not be read
    pub unreadable: usize,
    /// Why each failed candidate failed
    pub failures: Vec<FileFailure>,
    pub duration_ms: u64,
}
