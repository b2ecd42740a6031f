//! Timing and overlay tuning.
//!
//! The defaults are empirically tuned values; they are exposed so that hosts
//! with different input latency can re-tune them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default release tolerance when the activation chord held a single button.
pub const DEFAULT_SINGLE_RELEASE_MS: u64 = 40;
/// Default release tolerance when the activation chord held several buttons.
pub const DEFAULT_MULTI_RELEASE_MS: u64 = 75;
/// Default hover delay before a submenu transition executes.
pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 8;
/// Default settle time after a transition before another may start.
pub const DEFAULT_TRANSITION_SETTLE_MS: u64 = 16;

/// Debounce and transition timings, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    /// Chord-release tolerance for single-button activations.
    pub single_release_ms: u64,
    /// Chord-release tolerance for multi-button activations.
    pub multi_release_ms: u64,
    /// Delay between hover-enter on a launcher and the submenu swap.
    pub transition_delay_ms: u64,
    /// Delay after a swap before the next transition is permitted.
    pub transition_settle_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            single_release_ms: DEFAULT_SINGLE_RELEASE_MS,
            multi_release_ms: DEFAULT_MULTI_RELEASE_MS,
            transition_delay_ms: DEFAULT_TRANSITION_DELAY_MS,
            transition_settle_ms: DEFAULT_TRANSITION_SETTLE_MS,
        }
    }
}

impl Timing {
    /// Release tolerance for a chord that started with `buttons_at_activation` buttons.
    pub fn release_tolerance(&self, buttons_at_activation: usize) -> Duration {
        if buttons_at_activation > 1 {
            Duration::from_millis(self.multi_release_ms)
        } else {
            Duration::from_millis(self.single_release_ms)
        }
    }

    /// Hover delay as a `Duration`.
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// Settle delay as a `Duration`.
    pub fn transition_settle(&self) -> Duration {
        Duration::from_millis(self.transition_settle_ms)
    }
}

/// Overlay presentation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayOpts {
    /// Margin in pixels around a launcher that still counts as "on" it when a
    /// pending transition is re-validated.
    pub hover_margin: i32,
    /// Opacity applied to other top-level windows while the overlay is up.
    pub dim_opacity: f32,
    /// Submenu cache size past which the cache is purged on hide.
    pub submenu_cache_limit: usize,
    /// Upper bound on iterations when closing a host popup chain.
    pub popup_close_attempts: usize,
}

impl Default for OverlayOpts {
    fn default() -> Self {
        Self {
            hover_margin: 5,
            dim_opacity: 0.15,
            submenu_cache_limit: 50,
            popup_close_attempts: 10,
        }
    }
}
