//! # Error Module
//!
//! Error types for the photo organizer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Expected absence is not an error** - missing EXIF or GPS yields `None`
//! - **Per-file failures are values** - they are counted in the run result, not raised

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum PicPlaceError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

/// Errors that occur while walking the source folder
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while computing a content digest
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the reverse-geocoding service
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Geocoding request failed: {0}")]
    Request(String),

    #[error("Geocoding request timed out")]
    Timeout,

    #[error("Unexpected geocoding response: {0}")]
    InvalidResponse(String),

    #[error("Geocoding is disabled (offline mode)")]
    Offline,
}

/// Errors that occur with the geocode cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to serialize cache: {0}")]
    Serialize(String),

    #[error("Cache lock was poisoned by a panicking thread")]
    Poisoned,
}

/// Errors that occur while copying or moving a single file
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to create folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source file not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Failed to transfer {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy verification failed: source {expected} bytes, dest {actual} bytes")]
    Verification { expected: u64, actual: u64 },

    #[error("Path has no usable file name: {path}")]
    InvalidFileName { path: PathBuf },
}

/// Errors that occur with the persisted run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PicPlaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn transfer_error_includes_both_paths() {
        let error = TransferError::Copy {
            from: PathBuf::from("/photos/a.jpg"),
            to: PathBuf::from("/sorted/Paris/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/a.jpg"));
        assert!(message.contains("/sorted/Paris/a.jpg"));
    }

    #[test]
    fn scan_error_converts_to_top_level() {
        let error: PicPlaceError = ScanError::NotADirectory {
            path: PathBuf::from("/photos/file.jpg"),
        }
        .into();
        assert!(error.to_string().starts_with("Scanning error"));
    }
}
