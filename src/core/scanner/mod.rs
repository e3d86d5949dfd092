//! # Scanner Module
//!
//! Walks a source tree, keeps the supported images, and partitions them into a
//! duplicate-free candidate list plus groups of byte-identical files.
//!
//! ## Supported Formats
//! JPEG (.jpg, .jpeg), PNG, TIFF, BMP and GIF, matched case-insensitively.
//!
//! ## Example
//! ```rust,ignore
//! use picplace::core::scanner::{FolderScanner, ScanConfig};
//!
//! let outcome = FolderScanner::new(ScanConfig::default()).scan(Path::new("/photos"))?;
//! println!("{} photos, {} duplicate groups", outcome.candidates.len(), outcome.duplicate_groups.len());
//! ```

mod filter;
mod walker;

pub use filter::{ImageFilter, SUPPORTED_EXTENSIONS};
pub use walker::{group_by_digest, FolderScanner, ScanConfig};

use crate::core::hasher::ContentDigest;
use crate::core::metadata::PhotoMetadata;
use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A photo discovered by the scanner, enriched while it is organized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Absolute source path (the record's identity)
    pub path: PathBuf,
    /// Content digest, when the file could be read
    pub digest: Option<ContentDigest>,
    /// EXIF metadata; `None` until extracted or when the file has none
    pub metadata: Option<PhotoMetadata>,
    /// Resolved place name
    pub place: Option<String>,
}

impl PhotoRecord {
    pub fn new(path: PathBuf, digest: Option<ContentDigest>) -> Self {
        Self {
            path,
            digest,
            metadata: None,
            place: None,
        }
    }

    /// File name component for status messages
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Files sharing one content digest, in discovery order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub digest: ContentDigest,
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// The member that stays in the organized tree
    pub fn canonical(&self) -> &Path {
        &self.paths[0]
    }

    /// Every member except the canonical one
    pub fn redundant(&self) -> &[PathBuf] {
        &self.paths[1..]
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Result of scanning one source tree
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// One record per distinct content, in traversal order
    pub candidates: Vec<PhotoRecord>,
    /// Only groups with more than one member
    pub duplicate_groups: Vec<DuplicateGroup>,
    /// Supported files that could not be read for hashing
    pub unreadable: Vec<PathBuf>,
    /// Non-fatal traversal errors
    pub errors: Vec<ScanError>,
}
