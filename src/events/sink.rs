//! Narrow reporting interfaces consumed by the organize engine.
//!
//! The engine only ever talks to a [`ProgressSink`] and a [`StatusSink`]. It makes
//! no promise about which thread calls them; a UI must marshal back to its own
//! thread inside the implementation.

use super::{Event, EventSender, OrganizeEvent, OrganizeProgress};

/// Receives `(current, total)` after every candidate
pub trait ProgressSink {
    fn report(&self, current: usize, total: usize);
}

/// Receives human-readable status lines
pub trait StatusSink {
    fn report(&self, message: &str);
}

impl<F: Fn(usize, usize)> ProgressSink for F {
    fn report(&self, current: usize, total: usize) {
        self(current, total)
    }
}

impl<F: Fn(&str)> StatusSink for F {
    fn report(&self, message: &str) {
        self(message)
    }
}

impl ProgressSink for EventSender {
    fn report(&self, current: usize, total: usize) {
        self.send(Event::Organize(OrganizeEvent::Progress(OrganizeProgress {
            current,
            total,
        })));
    }
}

impl StatusSink for EventSender {
    fn report(&self, message: &str) {
        self.send(Event::Organize(OrganizeEvent::Status {
            message: message.to_string(),
        }));
    }
}

/// Discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _current: usize, _total: usize) {}
}

impl StatusSink for NullSink {
    fn report(&self, _message: &str) {}
}
