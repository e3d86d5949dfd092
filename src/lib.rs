//! # PicPlace
//!
//! Organizes a photo collection into folders named after where and when each
//! photo was taken.
//!
//! ## How a run works
//! - **Scan** - find supported images and group byte-identical files
//! - **Place** - read EXIF capture time and GPS, reverse-geocode through a cache
//! - **Transfer** - copy or move each distinct photo into its planned folder
//! - **Set aside** - photos without EXIF and redundant duplicates get their own buckets
//!
//! ## Architecture
//! - `core` - The organizing engine (UI-agnostic)
//! - `events` - Event-driven progress reporting
//! - `config` - Remembered run preferences
//! - `error` - Error types

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PicPlaceError, Result};

/// Initialize tracing for the library
///
/// Call once from the application entry point. Log output goes to stderr and is
/// filtered by `RUST_LOG`. A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
