//! # Core Module
//!
//! The UI-agnostic organizing engine.
//!
//! ## Modules
//! - `scanner` - Discovers photos and groups byte-identical files
//! - `hasher` - Computes content digests
//! - `metadata` - Extracts capture time and GPS from EXIF
//! - `geo` - Resolves coordinates to place names
//! - `cache` - Remembers resolved places between runs
//! - `organize` - Plans folders and transfers photos

pub mod cache;
pub mod geo;
pub mod hasher;
pub mod metadata;
pub mod organize;
pub mod scanner;

// Re-export commonly used types
pub use metadata::{Coordinates, PhotoMetadata};
pub use organize::{FolderStructure, OrganizeEngine, OrganizeRequest, RunResult, TransferMode};
pub use scanner::{DuplicateGroup, PhotoRecord};
