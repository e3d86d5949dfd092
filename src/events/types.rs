//! Event type definitions for progress reporting.

use crate::core::organize::RunResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the organizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Folder scanning events
    Scan(ScanEvent),
    /// Organize pass events
    Organize(OrganizeEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// A supported photo was found
    PhotoFound { path: PathBuf },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed {
        candidates: usize,
        duplicate_groups: usize,
    },
}

/// Events during the organize pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrganizeEvent {
    /// Human-readable status line
    Status { message: String },
    /// Progress update after each candidate
    Progress(OrganizeProgress),
    /// The run finished
    Completed { result: RunResult },
}

/// Progress information during the organize pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrganizeProgress {
    /// Candidates handled so far (successful or not)
    pub current: usize,
    /// Total number of candidates
    pub total: usize,
}
