//! Photo organization module.
//!
//! Places every distinct photo into a place/date folder tree under the destination,
//! routing photos without EXIF and redundant duplicates into dedicated buckets.

mod engine;
mod executor;
mod planner;
mod types;

pub use engine::{OrganizeEngine, OrganizeEngineBuilder};
pub use executor::OrganizeExecutor;
pub use planner::{PathPlanner, UNKNOWN_DATE};
pub use types::*;
