//! Mouse capture ownership and host popup dismissal.
//!
//! Exactly one party owns the mouse at a time. The sequence over a gesture is
//! `Released → Overlay → (Child) → Released`: the overlay takes capture when
//! the activation key goes down with buttons held, and hands it to a child
//! through a synthetic press/release when a release lands on a clickable
//! control.

use menu_keys::{Button, Buttons};
use tracing::{debug, trace};

use crate::{
    geom::Point,
    host::{MouseAction, SyntheticMouse, Toolkit, WidgetId, soft},
};

/// Who currently owns mouse capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureOwner {
    /// Nobody; the host routes the mouse normally.
    #[default]
    Released,
    /// The overlay holds the grab.
    Overlay,
    /// A child received a synthetic press and holds the implicit grab.
    Child(WidgetId),
}

/// Grabs, releases and hands off mouse capture.
#[derive(Debug)]
pub struct MouseCaptureCoordinator {
    owner: CaptureOwner,
    /// Bound on popup-chain closing iterations.
    popup_close_attempts: usize,
}

impl MouseCaptureCoordinator {
    /// New coordinator with nothing captured.
    pub fn new(popup_close_attempts: usize) -> Self {
        Self {
            owner: CaptureOwner::Released,
            popup_close_attempts,
        }
    }

    /// Current owner.
    pub fn owner(&self) -> CaptureOwner {
        self.owner
    }

    /// Update the popup-chain bound after a config change.
    pub fn set_popup_close_attempts(&mut self, n: usize) {
        self.popup_close_attempts = n;
    }

    /// Close host popups that would otherwise keep the mouse.
    ///
    /// Sends a release of the priority button to whoever holds the grab (or
    /// the widget under the cursor), walks the active popup chain, then
    /// sweeps any visible popup left over. Widgets inside the overlay are
    /// never touched.
    pub fn dismiss_external_popups<T: Toolkit + ?Sized>(&self, host: &mut T, buttons: Buttons) {
        let overlay = host.overlay();
        let cursor = host.cursor_pos();
        let button = buttons.priority().unwrap_or(Button::Primary);

        let target = host.mouse_grabber().or_else(|| host.widget_at(cursor));
        if let Some(t) = target
            && !host.is_ancestor_of(overlay, t)
        {
            let ev = SyntheticMouse {
                action: MouseAction::Release,
                local: local_pos(host, t, cursor),
                global: cursor,
                button,
                buttons: buttons - button.flag(),
            };
            trace!(target = %t, ?button, "dismiss_release");
            soft("send_mouse", host.send_mouse(t, ev));
        }

        for _ in 0..self.popup_close_attempts {
            let Some(p) = host.active_popup() else {
                break;
            };
            if host.is_ancestor_of(overlay, p) {
                break;
            }
            debug!(popup = %p, "closing_active_popup");
            if soft("close_popup", host.close_popup(p)).is_none() {
                break;
            }
        }

        for p in host.visible_popups() {
            if !host.is_ancestor_of(overlay, p) {
                debug!(popup = %p, "closing_stray_popup");
                soft("close_popup", host.close_popup(p));
            }
        }
    }

    /// Move capture onto the overlay.
    ///
    /// Synthesizes a press of the highest-priority held button at the
    /// cursor, carrying the full held mask, then grabs. Returns false when
    /// no button is held or the grab failed.
    pub fn transfer_to_overlay<T: Toolkit + ?Sized>(&mut self, host: &mut T, buttons: Buttons) -> bool {
        let Some(button) = buttons.priority() else {
            return false;
        };
        let overlay = host.overlay();
        if let Some(g) = host.mouse_grabber()
            && g != overlay
        {
            soft("release_mouse", host.release_mouse(g));
        }
        let cursor = host.cursor_pos();
        let ev = SyntheticMouse {
            action: MouseAction::Press,
            local: local_pos(host, overlay, cursor),
            global: cursor,
            button,
            buttons,
        };
        soft("send_mouse", host.send_mouse(overlay, ev));
        if soft("grab_mouse", host.grab_mouse(overlay)).is_some() {
            self.owner = CaptureOwner::Overlay;
            debug!(?button, "capture_overlay");
            true
        } else {
            self.owner = CaptureOwner::Released;
            false
        }
    }

    /// Hand capture to `child` so its own click handling fires.
    ///
    /// Releases the overlay grab, then delivers a press and a release of
    /// `button` at the cursor. Returns false if the child refused the press.
    pub fn hand_off<T: Toolkit + ?Sized>(&mut self, host: &mut T, child: WidgetId, button: Button) -> bool {
        self.release(host);
        let cursor = host.cursor_pos();
        let local = local_pos(host, child, cursor);
        let press = SyntheticMouse {
            action: MouseAction::Press,
            local,
            global: cursor,
            button,
            buttons: button.flag(),
        };
        if soft("send_mouse", host.send_mouse(child, press)).is_none() {
            return false;
        }
        self.owner = CaptureOwner::Child(child);
        trace!(child = %child, "capture_child");
        let release = SyntheticMouse {
            action: MouseAction::Release,
            buttons: Buttons::empty(),
            ..press
        };
        let ok = soft("send_mouse", host.send_mouse(child, release)).is_some();
        self.owner = CaptureOwner::Released;
        ok
    }

    /// Drop the overlay's grab if it holds one.
    pub fn release<T: Toolkit + ?Sized>(&mut self, host: &mut T) {
        if self.owner == CaptureOwner::Overlay {
            let overlay = host.overlay();
            soft("release_mouse", host.release_mouse(overlay));
            debug!("capture_released");
        }
        self.owner = CaptureOwner::Released;
    }
}

/// `global` in `w`'s coordinates; falls back to `global` for unknown widgets.
fn local_pos<T: Toolkit + ?Sized>(host: &T, w: WidgetId, global: Point) -> Point {
    host.widget_rect(w).map_or(global, |r| global - r.origin())
}
