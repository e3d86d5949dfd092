//! Directory walking and duplicate grouping.

use super::filter::{is_hidden, ImageFilter};
use super::{DuplicateGroup, PhotoRecord, ScanOutcome};
use crate::core::hasher::{ContentDigest, ContentHasher, Xxh3Hasher};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Configuration for the folder scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
        }
    }
}

/// Recursively discovers supported images and groups them by content
pub struct FolderScanner {
    config: ScanConfig,
    filter: ImageFilter,
    hasher: Box<dyn ContentHasher>,
}

impl FolderScanner {
    /// Create a scanner that digests files with XXH3
    pub fn new(config: ScanConfig) -> Self {
        let filter = ImageFilter::new().with_hidden(config.include_hidden);
        Self {
            config,
            filter,
            hasher: Box::new(Xxh3Hasher::new()),
        }
    }

    /// Scan without progress events
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        self.scan_with_events(root, &null_sender())
    }

    /// Scan `root`, reporting discoveries through `events`.
    ///
    /// Fails only when `root` is missing or not a directory. Paths are sorted before
    /// grouping, so the canonical member of each duplicate group is the one with the
    /// smallest path.
    pub fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanOutcome, ScanError> {
        if !root.exists() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let (mut paths, errors) = self.discover(root, events);
        paths.sort();

        let hashed: Vec<(PathBuf, Option<ContentDigest>)> = paths
            .into_par_iter()
            .map(|path| {
                let digest = match self.hasher.hash_file(&path) {
                    Ok(digest) => Some(digest),
                    Err(e) => {
                        debug!(error = %e, "skipping unhashable file");
                        None
                    }
                };
                (path, digest)
            })
            .collect();

        let (candidates, duplicate_groups, unreadable) = group_by_digest(hashed);

        info!(
            root = %root.display(),
            candidates = candidates.len(),
            duplicate_groups = duplicate_groups.len(),
            unreadable = unreadable.len(),
            "scan complete"
        );

        events.send(Event::Scan(ScanEvent::Completed {
            candidates: candidates.len(),
            duplicate_groups: duplicate_groups.len(),
        }));

        Ok(ScanOutcome {
            candidates,
            duplicate_groups,
            unreadable,
            errors,
        })
    }

    /// Collect every supported file under `root`
    fn discover(&self, root: &Path, events: &EventSender) -> (Vec<PathBuf>, Vec<ScanError>) {
        let mut paths = Vec::new();
        let mut errors = Vec::new();

        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry.path()));

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_file() || !self.filter.should_include(path) {
                        continue;
                    }

                    events.send(Event::Scan(ScanEvent::PhotoFound {
                        path: path.to_path_buf(),
                    }));
                    paths.push(path.to_path_buf());
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));

                    errors.push(error);
                }
            }
        }

        (paths, errors)
    }
}

/// Partition hashed paths into candidates and duplicate groups.
///
/// The first path seen for a digest becomes that digest's only candidate; every
/// path with the digest (the first included) joins its group. Only groups with
/// more than one member are returned, in order of first appearance. Paths without
/// a digest are returned separately and take no further part.
pub fn group_by_digest(
    hashed: Vec<(PathBuf, Option<ContentDigest>)>,
) -> (Vec<PhotoRecord>, Vec<DuplicateGroup>, Vec<PathBuf>) {
    let mut candidates = Vec::new();
    let mut unreadable = Vec::new();
    let mut order: Vec<ContentDigest> = Vec::new();
    let mut members: HashMap<ContentDigest, Vec<PathBuf>> = HashMap::new();

    for (path, digest) in hashed {
        let Some(digest) = digest else {
            unreadable.push(path);
            continue;
        };

        match members.get_mut(&digest) {
            Some(group) => group.push(path),
            None => {
                order.push(digest.clone());
                members.insert(digest.clone(), vec![path.clone()]);
                candidates.push(PhotoRecord::new(path, Some(digest)));
            }
        }
    }

    let duplicate_groups = order
        .into_iter()
        .filter_map(|digest| {
            let paths = members.remove(&digest)?;
            (paths.len() > 1).then_some(DuplicateGroup { digest, paths })
        })
        .collect();

    (candidates, duplicate_groups, unreadable)
}
