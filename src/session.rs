//! Host-session state: the current decoration set and edit debouncing.
//!
//! The session replaces the global decoration handle an editor extension
//! would otherwise hold: at most one decoration set is current at a time, a
//! new pass disposes the previous one, and the host owns the session value
//! rather than sharing ambient state. Last writer wins; a newer pass cancels
//! the visual effect of a stale one.

use std::time::{Duration, Instant};

use crate::decoration::DecorationSet;

/// Quiescence window for edit-triggered re-analysis.
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(500);

/// Owns the single current decoration set for one host session.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    current: Option<DecorationSet>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a new decoration set current, returning the disposed predecessor
    /// so the host can tear down its rendering.
    pub fn apply(&mut self, set: DecorationSet) -> Option<DecorationSet> {
        self.current.replace(set)
    }

    /// Drop the current set (e.g. on deactivation).
    pub fn clear(&mut self) -> Option<DecorationSet> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&DecorationSet> {
        self.current.as_ref()
    }
}

/// Debounces edit-triggered analysis: re-run only after edits settle for a
/// fixed quiescence window, each new edit resetting the window.
///
/// Pure state machine over instants so it can be driven (and tested) without
/// an event loop; the host calls `note_edit` on every change event and polls
/// `take_due` from its timer.
#[derive(Debug)]
pub struct Debouncer {
    quiescence: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiescence: Duration) -> Self {
        Self {
            quiescence,
            deadline: None,
        }
    }

    /// Record an edit at `now`, pushing the deadline out a full window.
    pub fn note_edit(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiescence);
    }

    /// Whether a re-analysis is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(d) if now >= d)
    }

    /// Consume a due deadline. Returns true exactly once per settled window.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Drop any pending deadline (e.g. the document closed).
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIESCENCE)
    }
}
