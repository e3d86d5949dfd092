//! # picplace CLI
//!
//! Command-line interface for the photo organizer.
//!
//! ## Usage
//! ```bash
//! picplace organize ~/Photos --dest ~/Sorted --mode copy
//! RUST_LOG=picplace=debug picplace scan ~/Photos
//! ```

mod cli;

use picplace::Result;

fn main() -> Result<()> {
    picplace::init_tracing();
    cli::run()
}
