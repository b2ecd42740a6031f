//! Hover-driven submenu transitions.
//!
//! Hovering a launcher schedules a swap to its submenu after a short delay.
//! The last request wins; hover-leave cancels. When the delay elapses the
//! cursor must still be on the launcher (within a margin), otherwise the
//! swap is dropped. After a swap, further requests are refused until the
//! settle timer clears the in-progress flag.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::{
    geom::Point,
    host::{Toolkit, WidgetId},
    menu::MenuId,
};

/// A scheduled swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    /// Submenu to swap in.
    pub target: MenuId,
    /// Launcher that was hovered.
    pub source: WidgetId,
    /// When the request was made.
    pub scheduled_at: Instant,
    /// When the swap is due.
    pub deadline: Instant,
}

/// Debounced, validated submenu transitions.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    pending: Option<PendingTransition>,
    in_transition: bool,
    completed: u64,
}

impl TransitionScheduler {
    /// Idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a swap to `target`, replacing any pending one.
    ///
    /// Returns the deadline, or `None` while a previous swap is settling.
    pub fn request(
        &mut self,
        target: MenuId,
        source: WidgetId,
        now: Instant,
        delay: Duration,
    ) -> Option<Instant> {
        if self.in_transition {
            trace!(%target, "transition_refused_settling");
            return None;
        }
        let deadline = now + delay;
        if let Some(prev) = self.pending.replace(PendingTransition {
            target: target.clone(),
            source,
            scheduled_at: now,
            deadline,
        }) {
            trace!(prev = %prev.target, %target, "transition_replaced");
        } else {
            trace!(%target, "transition_scheduled");
        }
        Some(deadline)
    }

    /// Drop the pending swap. Returns whether one was live.
    pub fn cancel(&mut self) -> bool {
        let was = self.pending.take().is_some();
        if was {
            trace!("transition_cancelled");
        }
        was
    }

    /// The pending swap.
    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    /// Take the pending swap for execution.
    pub fn take(&mut self) -> Option<PendingTransition> {
        self.pending.take()
    }

    /// True if the cursor is still within `margin` of the launcher.
    pub fn validate<T: Toolkit + ?Sized>(host: &T, p: &PendingTransition, margin: i32) -> bool {
        let cursor = host.cursor_pos();
        let ok = host
            .widget_rect(p.source)
            .is_some_and(|r| r.inflate(margin).contains(cursor));
        if !ok {
            debug!(target = %p.target, "transition_aborted_cursor_left");
        }
        ok
    }

    /// Offset that puts the widget named like `source` inside `target_root`
    /// exactly where `source` is now.
    pub fn anchor_delta<T: Toolkit + ?Sized>(
        host: &T,
        source: WidgetId,
        target_root: WidgetId,
    ) -> Option<Point> {
        let name = host.widget_name(source)?;
        let equivalent = host.find_child(target_root, &name)?;
        let from = host.widget_rect(source)?.center();
        let to = host.widget_rect(equivalent)?.center();
        Some(from - to)
    }

    /// Mark a swap as in progress.
    pub fn begin_swap(&mut self) {
        self.in_transition = true;
        self.completed += 1;
    }

    /// The settle timer elapsed.
    pub fn settle(&mut self) {
        self.in_transition = false;
    }

    /// True between a swap and its settle timer.
    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    /// Swaps performed so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.pending = None;
        self.in_transition = false;
    }
}
