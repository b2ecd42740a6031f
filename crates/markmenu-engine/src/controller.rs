//! The activation controller: top-level orchestration of a gesture.
//!
//! The host feeds raw input through the entry points below (or through
//! [`ActivationController::handle`]) and drives timers with
//! [`next_deadline`](ActivationController::next_deadline) and
//! [`poll_timers`](ActivationController::poll_timers). Entry points never
//! fail: misses are silent, host failures are logged at `debug`.

use std::time::Instant;

use menu_config::{Bindings, Config, OverlayOpts, Timing};
use menu_keys::{Button, Buttons, Key, Modifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

use crate::{
    binding::BindingTable,
    capture::{CaptureOwner, MouseCaptureCoordinator},
    chord::{ChordTracker, ReleaseOutcome},
    events::{ControllerEvent, EventDispatcher, InputEvent},
    geom::Point,
    host::{Host, WidgetId, WidgetKind, soft},
    menu::{MenuId, MenuNode, TAG_SUBMENU, Taggable},
    presenter::{OverlayPresenter, Placement},
    resolver::{Resolution, WidgetActionResolver},
    timer::{TimerKind, TimerQueue},
    transition::TransitionScheduler,
};

/// Owns every component and reacts to input for one overlay.
pub struct ActivationController<H> {
    host: H,
    bindings: BindingTable,
    chord: ChordTracker,
    capture: MouseCaptureCoordinator,
    transitions: TransitionScheduler,
    presenter: OverlayPresenter,
    timers: TimerQueue,
    timing: Timing,
    opts: OverlayOpts,
    /// Activation key currently held down, as pressed.
    held_key: Option<Key>,
    events: EventDispatcher,
}

impl<H: Host> ActivationController<H> {
    /// Build a controller around `host` with the given configuration.
    pub fn new(host: H, config: &Config) -> Self {
        Self {
            host,
            bindings: BindingTable::build(&config.bindings),
            chord: ChordTracker::new(),
            capture: MouseCaptureCoordinator::new(config.overlay.popup_close_attempts),
            transitions: TransitionScheduler::new(),
            presenter: OverlayPresenter::new(config.overlay),
            timers: TimerQueue::new(),
            timing: config.timing,
            opts: config.overlay,
            held_key: None,
            events: EventDispatcher::disconnected(),
        }
    }

    /// Send [`ControllerEvent`]s to `tx`.
    pub fn with_events(mut self, tx: UnboundedSender<ControllerEvent>) -> Self {
        self.events = EventDispatcher::new(tx);
        self
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, e.g. to move a simulated cursor.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the controller and return the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Current binding table.
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Chord tracker state.
    pub fn chord(&self) -> &ChordTracker {
        &self.chord
    }

    /// Transition scheduler state.
    pub fn transitions(&self) -> &TransitionScheduler {
        &self.transitions
    }

    /// Presenter state.
    pub fn presenter(&self) -> &OverlayPresenter {
        &self.presenter
    }

    /// Who owns mouse capture.
    pub fn capture_owner(&self) -> CaptureOwner {
        self.capture.owner()
    }

    /// True while the activation key is held.
    pub fn is_activation_held(&self) -> bool {
        self.held_key.is_some()
    }

    /// True while the overlay is up.
    pub fn is_visible(&self) -> bool {
        self.host.overlay_visible()
    }

    /// Rebuild the lookup table from a new bindings configuration.
    pub fn set_bindings(&mut self, raw: &Bindings) {
        self.bindings = BindingTable::build(raw);
        debug!(entries = self.bindings.len(), "bindings_applied");
    }

    /// Apply a whole configuration: bindings, timings and overlay knobs.
    pub fn apply_config(&mut self, config: &Config) {
        self.set_bindings(&config.bindings);
        self.timing = config.timing;
        self.opts = config.overlay;
        self.presenter.set_opts(config.overlay);
        self.capture
            .set_popup_close_attempts(config.overlay.popup_close_attempts);
    }

    /// Dispatch one input event to its entry point.
    pub fn handle(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::KeyPress {
                key,
                modifiers,
                buttons,
                repeat,
            } => self.key_press(key, modifiers, buttons, repeat),
            InputEvent::KeyRelease { key, repeat } => self.key_release(key, repeat),
            InputEvent::MousePress { buttons, modifiers } => self.mouse_press(buttons, modifiers),
            InputEvent::MouseRelease {
                remaining,
                modifiers,
            } => self.mouse_release(remaining, modifiers),
            InputEvent::HoverEnter(w) => self.hover_enter(w),
            InputEvent::HoverLeave(w) => self.hover_leave(w),
            InputEvent::Show { target, hint } => {
                self.show(target.as_ref(), hint);
            }
            InputEvent::Hide => self.hide(),
        }
    }

    /// A key went down.
    ///
    /// The activation key starts a gesture; auto-repeat and presses while
    /// already held are ignored. Other keys switch menus while the overlay
    /// is up.
    pub fn key_press(&mut self, key: Key, modifiers: Modifiers, buttons: Buttons, repeat: bool) {
        if Some(key) == self.bindings.activation_key() {
            if repeat || self.held_key.is_some() {
                trace!(key = %key.to_spec(), "activation_repeat_ignored");
                return;
            }
            self.activation_pressed(key, modifiers, buttons);
            return;
        }
        if !self.host.overlay_visible() {
            return;
        }
        let keys: Vec<Key> = self.held_key.into_iter().chain([key]).collect();
        if let Some(target) = self
            .bindings
            .lookup_keys(&keys, modifiers, Buttons::empty())
            .cloned()
        {
            self.show(Some(&target), None);
        }
    }

    /// A key came up. Releasing the activation key ends the gesture.
    pub fn key_release(&mut self, key: Key, repeat: bool) {
        if repeat || self.held_key != Some(key) {
            return;
        }
        self.held_key = None;
        debug!(key = %key.to_spec(), "activation_released");
        self.events.emit(ControllerEvent::ActivationReleased);
        self.hide();
    }

    fn activation_pressed(&mut self, key: Key, modifiers: Modifiers, buttons: Buttons) {
        self.held_key = Some(key);
        debug!(key = %key.to_spec(), ?buttons, ?modifiers, "activation_pressed");
        self.events.emit(ControllerEvent::ActivationPressed);

        self.chord.on_press(buttons, modifiers);
        self.capture
            .dismiss_external_popups(&mut self.host, buttons);
        let Some(target) = self.bindings.lookup(buttons, modifiers, Some(key)).cloned() else {
            trace!(?buttons, ?modifiers, "activation_unbound");
            return;
        };
        self.show(Some(&target), None);
        if self.host.overlay_visible() && !buttons.is_empty() {
            self.capture.transfer_to_overlay(&mut self.host, buttons);
        }
    }

    /// A mouse button went down while the overlay is up.
    pub fn mouse_press(&mut self, buttons: Buttons, modifiers: Modifiers) {
        if !self.host.overlay_visible() {
            return;
        }
        self.chord.on_press(buttons, modifiers);
        self.timers.stop(TimerKind::ChordRelease);
        if self.presenter.current().is_none() {
            return;
        }
        let key = self.held_key;
        if let Some(target) = self.bindings.lookup(buttons, modifiers, key).cloned() {
            self.show(Some(&target), None);
        }
    }

    /// A mouse button came up, leaving `remaining` held.
    ///
    /// A release over a launcher or a control in the current menu acts on
    /// it directly. Anything else feeds the chord debouncer.
    pub fn mouse_release(&mut self, remaining: Buttons, modifiers: Modifiers) {
        if !self.host.overlay_visible() {
            trace!("release_ignored_hidden");
            return;
        }
        let released = self.chord.state().buttons_held - remaining;

        if let Some(cur) = self.presenter.current().map(|n| n.id) {
            let cursor = self.host.cursor_pos();
            if let Some(w) = self.host.widget_at(cursor)
                && w != self.host.overlay()
            {
                if !self.host.is_ancestor_of(cur, w) {
                    trace!(widget = %w, "release_outside_menu");
                    return;
                }
                match WidgetActionResolver::classify(&self.host, w, cursor) {
                    Resolution::Launch { target, .. } => {
                        self.chord.observe(remaining, modifiers);
                        self.show(Some(&target), None);
                        return;
                    }
                    Resolution::Activate { widget } => {
                        self.activate(widget, released.priority().unwrap_or(Button::Primary));
                        return;
                    }
                    Resolution::Inert => {}
                }
            }
        }

        let now = self.host.now();
        match self
            .chord
            .on_release(remaining, modifiers, now, &self.timing)
        {
            ReleaseOutcome::Resolve { buttons, modifiers } => {
                self.timers.stop(TimerKind::ChordRelease);
                self.resolve_chord(buttons, modifiers);
            }
            ReleaseOutcome::Pending { deadline } => {
                self.timers.start(TimerKind::ChordRelease, deadline);
            }
        }
    }

    /// Click `widget` through a capture hand-off, then close the overlay.
    fn activate(&mut self, widget: WidgetId, button: Button) {
        let fired = self.capture.hand_off(&mut self.host, widget, button);
        self.hide();
        if fired {
            debug!(widget = %widget, "action_fired");
            self.events.emit(ControllerEvent::ActionFired(widget));
        }
    }

    fn resolve_chord(&mut self, buttons: Buttons, modifiers: Modifiers) {
        let key = self.held_key;
        if buttons.is_empty() && key.is_none() {
            trace!("chord_fully_released");
            self.hide();
            return;
        }
        match self.bindings.lookup(buttons, modifiers, key).cloned() {
            Some(target) => {
                self.show(Some(&target), None);
            }
            None => trace!(?buttons, "chord_unbound"),
        }
        self.chord.resolved();
    }

    /// The cursor entered a widget.
    ///
    /// Launchers in the current menu schedule a transition to their
    /// submenu; toggles inside a submenu flip.
    pub fn hover_enter(&mut self, w: WidgetId) {
        if !self.host.overlay_visible() {
            return;
        }
        let Some(cur) = self.presenter.current().cloned() else {
            return;
        };
        if !self.host.is_ancestor_of(cur.id, w) {
            return;
        }
        match self.host.widget_kind(w) {
            Some(WidgetKind::Launcher { target }) => self.request_transition(&cur, w, &target),
            Some(WidgetKind::Toggle) if cur.has_tag(TAG_SUBMENU) => {
                soft("toggle", self.host.toggle(w));
            }
            _ => {}
        }
    }

    fn request_transition(&mut self, cur: &MenuNode, source: WidgetId, target: &MenuId) {
        let submenu = MenuId::from(target.base()).with_tag(TAG_SUBMENU);
        if submenu == cur.name {
            return;
        }
        match self.presenter.resolve(&mut self.host, &submenu) {
            Some(node) if node.is_radial() => {}
            _ => return,
        }
        let now = self.host.now();
        if let Some(deadline) =
            self.transitions
                .request(submenu, source, now, self.timing.transition_delay())
        {
            self.timers.start(TimerKind::Transition, deadline);
        }
    }

    /// The cursor left a widget: any pending transition is dropped.
    pub fn hover_leave(&mut self, _w: WidgetId) {
        if self.transitions.cancel() {
            self.timers.stop(TimerKind::Transition);
        }
    }

    /// Earliest armed timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Run every timer due at the host's current time.
    pub fn poll_timers(&mut self) {
        while let Some(kind) = self.timers.pop_due(self.host.now()) {
            match kind {
                TimerKind::ChordRelease => {
                    if let Some((buttons, modifiers)) = self.chord.fire() {
                        self.resolve_chord(buttons, modifiers);
                    }
                }
                TimerKind::Transition => self.run_transition(),
                TimerKind::TransitionSettle => self.transitions.settle(),
            }
        }
    }

    fn run_transition(&mut self) {
        let Some(p) = self.transitions.take() else {
            return;
        };
        if !TransitionScheduler::validate(&self.host, &p, self.opts.hover_margin) {
            return;
        }
        self.transitions.begin_swap();
        let placement = Placement::Anchor { source: p.source };
        if let Some(node) = self.presenter.show(&mut self.host, &p.target, placement) {
            debug!(menu = %node.name, "transition_done");
            self.events.emit(ControllerEvent::MenuShown(node.name));
        }
        let settle = self.host.now() + self.timing.transition_settle();
        self.timers.start(TimerKind::TransitionSettle, settle);
    }

    /// Show a menu; `None` shows the activation key's menu.
    ///
    /// Returns the node shown. Without an activation key, or on a lookup
    /// miss, nothing happens.
    pub fn show(&mut self, target: Option<&MenuId>, hint: Option<Point>) -> Option<MenuNode> {
        if self.chord.cancel_pending() {
            self.timers.stop(TimerKind::ChordRelease);
        }
        if self.transitions.cancel() {
            self.timers.stop(TimerKind::Transition);
        }
        let target = match target {
            Some(t) => t.clone(),
            None => match self.bindings.default_menu() {
                Some(m) => m.clone(),
                None => {
                    debug!("show_without_default_menu");
                    return None;
                }
            },
        };
        let was_visible = self.host.overlay_visible();
        let placement = hint.map_or(Placement::Cursor, Placement::At);
        let node = self.presenter.show(&mut self.host, &target, placement)?;
        if node.is_radial() {
            self.presenter.dim_other_windows(&mut self.host);
        } else {
            self.reset_gesture();
            if was_visible {
                self.events.emit(ControllerEvent::Hidden);
            }
        }
        self.events
            .emit(ControllerEvent::MenuShown(node.name.clone()));
        Some(node)
    }

    /// Hide the overlay and reset all gesture state. Idempotent.
    pub fn hide(&mut self) {
        self.reset_gesture();
        if self.presenter.hide(&mut self.host) {
            self.events.emit(ControllerEvent::Hidden);
        }
    }

    fn reset_gesture(&mut self) {
        self.timers.clear();
        self.chord.reset();
        self.transitions.reset();
        self.capture.release(&mut self.host);
    }
}
