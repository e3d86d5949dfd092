//! Single-file copy/move into a destination folder.

use super::types::TransferMode;
use crate::core::hasher::{ContentHasher, Xxh3Hasher};
use crate::error::TransferError;
use filetime::FileTime;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Transfers photos into planned folders
pub struct OrganizeExecutor;

impl OrganizeExecutor {
    /// Copy or move `source` into `dest_dir`, keeping its file name.
    ///
    /// The folder is created when missing. An existing file of the same name is
    /// never overwritten: a numeric suffix is added instead, unless that file
    /// already holds the same bytes, in which case the photo counts as transferred
    /// (a move then just removes the source). Returns the final path.
    pub fn transfer(
        source: &Path,
        dest_dir: &Path,
        mode: TransferMode,
    ) -> Result<PathBuf, TransferError> {
        if !source.is_file() {
            return Err(TransferError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| TransferError::InvalidFileName {
                path: source.to_path_buf(),
            })?;

        fs::create_dir_all(dest_dir).map_err(|source| TransferError::CreateDir {
            path: dest_dir.to_path_buf(),
            source,
        })?;

        let dest_path = match Self::choose_destination(source, &dest_dir.join(file_name)) {
            Destination::Free(path) => path,
            // Already where it belongs
            Destination::Itself(path) => return Ok(path),
            Destination::Identical(path) => {
                debug!(path = %path.display(), "identical file already organized");
                if mode == TransferMode::Move {
                    fs::remove_file(source).map_err(|e| TransferError::Copy {
                        from: source.to_path_buf(),
                        to: path.clone(),
                        source: e,
                    })?;
                }
                return Ok(path);
            }
        };

        match mode {
            TransferMode::Copy => Self::copy_preserving(source, &dest_path),
            TransferMode::Move => Self::move_file(source, &dest_path),
        }?;

        Ok(dest_path)
    }

    /// Walk `wanted`, `stem_1.ext`, `stem_2.ext`, ... until a free name, the source
    /// itself, or a byte-identical copy of the source turns up
    fn choose_destination(source: &Path, wanted: &Path) -> Destination {
        let mut counter = 0;
        loop {
            let candidate = if counter == 0 {
                wanted.to_path_buf()
            } else {
                numbered_path(wanted, counter)
            };

            if !candidate.exists() {
                return Destination::Free(candidate);
            }
            if is_same_file(source, &candidate) {
                return Destination::Itself(candidate);
            }
            if same_content(source, &candidate) {
                return Destination::Identical(candidate);
            }
            counter += 1;
        }
    }

    /// Copy contents and permissions, then carry over access/modification times
    fn copy_preserving(source: &Path, dest: &Path) -> Result<(), TransferError> {
        let copy_error = |e: io::Error| TransferError::Copy {
            from: source.to_path_buf(),
            to: dest.to_path_buf(),
            source: e,
        };

        let metadata = fs::metadata(source).map_err(copy_error)?;
        fs::copy(source, dest).map_err(copy_error)?;

        let atime = FileTime::from_last_access_time(&metadata);
        let mtime = FileTime::from_last_modification_time(&metadata);
        if let Err(e) = filetime::set_file_times(dest, atime, mtime) {
            warn!(path = %dest.display(), error = %e, "copied without original timestamps");
        }

        Ok(())
    }

    /// Rename, falling back to copy + size check + delete across filesystems
    fn move_file(source: &Path, dest: &Path) -> Result<(), TransferError> {
        if fs::rename(source, dest).is_ok() {
            return Ok(());
        }

        let source_size = fs::metadata(source)
            .map_err(|e| TransferError::Copy {
                from: source.to_path_buf(),
                to: dest.to_path_buf(),
                source: e,
            })?
            .len();

        Self::copy_preserving(source, dest)?;

        // Verify destination size matches source before deleting
        let dest_size = fs::metadata(dest).map(|m| m.len()).unwrap_or(0);
        if dest_size != source_size {
            let _ = fs::remove_file(dest);
            return Err(TransferError::Verification {
                expected: source_size,
                actual: dest_size,
            });
        }

        fs::remove_file(source).map_err(|e| TransferError::Copy {
            from: source.to_path_buf(),
            to: dest.to_path_buf(),
            source: e,
        })
    }
}

/// Outcome of looking for a destination name
enum Destination {
    /// Nothing there yet
    Free(PathBuf),
    /// The source is already at this path
    Itself(PathBuf),
    /// A different file with the source's bytes
    Identical(PathBuf),
}

/// `wanted` with `_N` appended to its stem, kept as `OsStr` so any file name survives
fn numbered_path(wanted: &Path, counter: usize) -> PathBuf {
    let mut name = wanted
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("file"));
    name.push(format!("_{}", counter));
    if let Some(ext) = wanted.extension() {
        name.push(".");
        name.push(ext);
    }
    wanted.with_file_name(name)
}

/// Equal sizes and equal content digests
fn same_content(a: &Path, b: &Path) -> bool {
    let size = |p: &Path| fs::metadata(p).map(|m| m.len()).ok();
    match (size(a), size(b)) {
        (Some(x), Some(y)) if x == y => {}
        _ => return false,
    }

    let hasher = Xxh3Hasher::new();
    match (hasher.hash_file(a), hasher.hash_file(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// Both paths exist and resolve to the same file
pub(crate) fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
