//! # Hasher Module
//!
//! Computes content digests used to detect byte-identical photos.
//!
//! Files are streamed in fixed-size chunks through XXH3-128, so large images are
//! never loaded into memory at once. Two files share a digest only when their
//! bytes are identical (modulo a 2^-128 collision chance).

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Read buffer size for streaming digests
const CHUNK_SIZE: usize = 64 * 1024;

/// Fixed-size fingerprint of a file's bytes, rendered as 32 hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes content digests for files
pub trait ContentHasher: Send + Sync {
    fn hash_file(&self, path: &Path) -> Result<ContentDigest, HashError>;
}

/// Streaming XXH3-128 content hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3Hasher;

impl Xxh3Hasher {
    pub fn new() -> Self {
        Self
    }

    /// Digest everything a reader yields
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> std::io::Result<ContentDigest> {
        let mut hasher = Xxh3::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(ContentDigest(format!("{:032x}", hasher.digest128())))
    }
}

impl ContentHasher for Xxh3Hasher {
    fn hash_file(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let io_error = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        self.hash_reader(file).map_err(io_error)
    }
}
