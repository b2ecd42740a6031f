//! Deadline queue for the controller's one-shot timers.
//!
//! Each [`TimerKind`] has at most one live deadline. Starting a kind replaces
//! its deadline, stopping removes it. The owner polls the queue with the
//! current time and handles due timers one at a time, re-reading the queue in
//! between, so a timer stopped by an earlier callback never fires.

use std::{collections::HashMap, time::Instant};

use tracing::trace;

/// The one-shot timers the controller arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Chord-release debounce.
    ChordRelease,
    /// Hover delay before a submenu swap.
    Transition,
    /// Cool-down after a swap.
    TransitionSettle,
}

/// At most one deadline per [`TimerKind`].
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: HashMap<TimerKind, Instant>,
}

impl TimerQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or replace the timer for `kind`.
    pub fn start(&mut self, kind: TimerKind, deadline: Instant) {
        if self.entries.insert(kind, deadline).is_some() {
            trace!(?kind, "timer_replaced");
        } else {
            trace!(?kind, "timer_start");
        }
    }

    /// Stop a timer if present. Returns whether one was armed.
    pub fn stop(&mut self, kind: TimerKind) -> bool {
        let was = self.entries.remove(&kind).is_some();
        if was {
            trace!(?kind, "timer_stop");
        }
        was
    }

    /// Check if a timer is armed for `kind`.
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Deadline of an armed timer.
    pub fn deadline(&self, kind: TimerKind) -> Option<Instant> {
        self.entries.get(&kind).copied()
    }

    /// Earliest deadline across all timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().min().copied()
    }

    /// Remove and return the earliest timer due at `now`.
    ///
    /// Ties resolve in [`TimerKind`] order.
    pub fn pop_due(&mut self, now: Instant) -> Option<TimerKind> {
        let kind = self
            .entries
            .iter()
            .filter(|(_, d)| **d <= now)
            .min_by_key(|(k, d)| (**d, **k))
            .map(|(k, _)| *k)?;
        self.entries.remove(&kind);
        trace!(?kind, "timer_fire");
        Some(kind)
    }

    /// Stop every timer.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            trace!(count = self.entries.len(), "timer_clear");
            self.entries.clear();
        }
    }
}
