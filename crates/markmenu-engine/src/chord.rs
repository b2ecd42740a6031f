//! Held-button tracking and chord-release debouncing.
//!
//! Releasing a multi-button chord is never perfectly simultaneous. The tracker
//! turns a burst of releases into a single resolution: while buttons remain
//! held, each release re-arms a short tolerance window, and only when the
//! window lapses (or the last button goes up) is the chord resolved.

use std::time::Instant;

use menu_config::Timing;
use menu_keys::{Buttons, Modifiers};
use tracing::{debug, trace};

/// Where the tracker is in a gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChordPhase {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture started; buttons may still be pressed or released.
    Activated,
    /// A release is being resolved.
    Resolving,
    /// Some buttons were released and the tolerance window is open.
    PendingRelease,
}

/// Input state of the current gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChordState {
    /// Buttons held right now.
    pub buttons_held: Buttons,
    /// Modifiers held right now.
    pub modifiers_held: Modifiers,
    /// Buttons held when the gesture started.
    pub buttons_at_activation: Buttons,
}

/// A deferred resolution waiting for the remaining buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingChordRelease {
    /// Buttons still held at the last release.
    pub remaining_buttons: Buttons,
    /// Modifiers held at the last release.
    pub modifiers: Modifiers,
    /// When the window lapses.
    pub deadline: Instant,
}

/// What the controller should do after a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Resolve now with this state.
    Resolve {
        /// Buttons still held.
        buttons: Buttons,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// Arm or re-arm the chord timer.
    Pending {
        /// Timer deadline.
        deadline: Instant,
    },
}

/// Chord state machine: `Idle → Activated → {Resolving, PendingRelease} → Idle`.
#[derive(Debug, Default)]
pub struct ChordTracker {
    phase: ChordPhase,
    state: ChordState,
    pending: Option<PendingChordRelease>,
    /// Number of resolutions since the tracker was created.
    resolutions: u64,
}

impl ChordTracker {
    /// Idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> ChordPhase {
        self.phase
    }

    /// Current gesture state.
    pub fn state(&self) -> ChordState {
        self.state
    }

    /// The live deferred resolution, if any.
    pub fn pending(&self) -> Option<&PendingChordRelease> {
        self.pending.as_ref()
    }

    /// Resolutions handed out so far, immediate and deferred.
    pub fn resolutions(&self) -> u64 {
        self.resolutions
    }

    /// True if the gesture started with more than one button.
    pub fn is_multi_button(&self) -> bool {
        self.state.buttons_at_activation.count() > 1
    }

    /// Record a press. Returns true for the first press of a gesture, which
    /// snapshots the held buttons as the activation chord.
    ///
    /// A press also drops any deferred resolution; the gesture changed.
    pub fn on_press(&mut self, buttons: Buttons, modifiers: Modifiers) -> bool {
        let first = self.phase == ChordPhase::Idle;
        if first {
            self.state.buttons_at_activation = buttons;
            debug!(buttons = ?buttons, "chord_activated");
        }
        self.state.buttons_held = buttons;
        self.state.modifiers_held = modifiers;
        self.pending = None;
        self.phase = ChordPhase::Activated;
        first
    }

    /// Track held state without touching the phase or pending resolution.
    pub fn observe(&mut self, buttons: Buttons, modifiers: Modifiers) {
        self.state.buttons_held = buttons;
        self.state.modifiers_held = modifiers;
    }

    /// Record a release leaving `remaining` held.
    ///
    /// With nothing left held the chord resolves immediately. Otherwise the
    /// tolerance window is (re)armed: `multi_release_ms` when the gesture
    /// started with several buttons, else `single_release_ms`.
    pub fn on_release(
        &mut self,
        remaining: Buttons,
        modifiers: Modifiers,
        now: Instant,
        timing: &Timing,
    ) -> ReleaseOutcome {
        self.state.buttons_held = remaining;
        self.state.modifiers_held = modifiers;
        if remaining.is_empty() {
            if self.pending.take().is_some() {
                trace!("chord_pending_coalesced");
            }
            self.begin_resolution();
            return ReleaseOutcome::Resolve {
                buttons: remaining,
                modifiers,
            };
        }
        let deadline = now + timing.release_tolerance(self.state.buttons_at_activation.count());
        self.pending = Some(PendingChordRelease {
            remaining_buttons: remaining,
            modifiers,
            deadline,
        });
        self.phase = ChordPhase::PendingRelease;
        trace!(remaining = ?remaining, "chord_release_deferred");
        ReleaseOutcome::Pending { deadline }
    }

    /// The chord timer lapsed: take the last observed state for resolution.
    pub fn fire(&mut self) -> Option<(Buttons, Modifiers)> {
        let p = self.pending.take()?;
        self.begin_resolution();
        Some((p.remaining_buttons, p.modifiers))
    }

    /// Resolution finished; the gesture continues.
    pub fn resolved(&mut self) {
        if self.phase == ChordPhase::Resolving {
            self.phase = ChordPhase::Activated;
        }
    }

    /// Drop a deferred resolution. Returns whether one was live.
    pub fn cancel_pending(&mut self) -> bool {
        let was = self.pending.take().is_some();
        if self.phase == ChordPhase::PendingRelease {
            self.phase = ChordPhase::Activated;
        }
        was
    }

    /// Forget the gesture entirely.
    pub fn reset(&mut self) {
        self.phase = ChordPhase::Idle;
        self.state = ChordState::default();
        self.pending = None;
    }

    fn begin_resolution(&mut self) {
        self.phase = ChordPhase::Resolving;
        self.resolutions += 1;
        trace!(n = self.resolutions, "chord_resolve");
    }
}
