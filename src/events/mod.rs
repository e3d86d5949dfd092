//! # Events Module
//!
//! Event-driven progress reporting, so any front end (CLI, GUI) can follow a run.
//!
//! ## Design
//! The engine reports through two narrow sinks ([`ProgressSink`], [`StatusSink`]).
//! [`EventSender`] implements both, turning reports into [`Event`]s on a channel
//! that a UI thread can drain.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Organize(OrganizeEvent::Progress(p)) = event {
//!             println!("{}/{}", p.current, p.total);
//!         }
//!     }
//! });
//!
//! engine.organize_with_events(&request, &sender)?;
//! ```

mod channel;
mod sink;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use sink::{NullSink, ProgressSink, StatusSink};
pub use types::*;
