//! Replay a script against a [`Scene`] on a virtual clock.

use std::time::{Duration, Instant};

use markmenu_engine::{
    ActivationController, ControllerEvent, MenuId, Point, Scene, Toolkit, WidgetId,
};
use menu_config::Config;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    script::{Chord, Script, Step},
};

/// Drives a controller from script steps and records what happened.
pub struct Replay {
    /// Controller over the simulated host.
    ctl: ActivationController<Scene>,
    /// Controller event feed.
    events: UnboundedReceiver<ControllerEvent>,
    /// Virtual time at construction.
    start: Instant,
    /// Rendered transcript.
    lines: Vec<String>,
}

impl Replay {
    /// Build a controller around `scene`.
    pub fn new(cfg: &Config, scene: Scene) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let start = scene.now();
        let ctl = ActivationController::new(scene, cfg).with_events(tx);
        Self {
            ctl,
            events,
            start,
            lines: Vec::new(),
        }
    }

    /// Replay every step in order.
    pub fn run(&mut self, script: &Script) -> Result<()> {
        for (i, step) in script.steps.iter().enumerate() {
            trace!(n = i, ?step, "replay_step");
            self.step(step)?;
            self.flush();
        }
        Ok(())
    }

    /// Transcript lines: host calls and controller events with virtual timestamps.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The controller, for inspection.
    pub fn controller(&self) -> &ActivationController<Scene> {
        &self.ctl
    }

    fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Press(spec) => {
                let c = Chord::parse(spec)?;
                let key = c.require_key(spec)?;
                self.ctl.key_press(key, c.modifiers, c.buttons, false);
            }
            Step::Release(spec) => {
                let key = Chord::parse(spec)?.require_key(spec)?;
                self.ctl.key_release(key, false);
            }
            Step::MouseDown(spec) => {
                let c = Chord::parse(spec)?;
                self.ctl.mouse_press(c.buttons, c.modifiers);
            }
            Step::MouseUp(spec) => {
                let c = Chord::parse(spec)?;
                self.ctl.mouse_release(c.buttons, c.modifiers);
            }
            Step::Hover(name) => {
                let w = self.widget(name)?;
                self.ctl.host_mut().hover(w);
                self.ctl.hover_enter(w);
            }
            Step::Leave(name) => {
                let w = self.widget(name)?;
                self.ctl.hover_leave(w);
            }
            Step::Cursor(x, y) => self.ctl.host_mut().set_cursor(Point::new(*x, *y)),
            Step::Wait(ms) => self.wait(Duration::from_millis(*ms)),
            Step::Show(target) => {
                let target = target.as_deref().map(MenuId::from);
                self.ctl.show(target.as_ref(), None);
            }
            Step::Hide => self.ctl.hide(),
        }
        Ok(())
    }

    /// Advance the clock, stopping at each timer deadline on the way so
    /// timers that re-arm relative to "now" see the right time.
    fn wait(&mut self, d: Duration) {
        let end = self.ctl.host().now() + d;
        while let Some(deadline) = self.ctl.next_deadline()
            && deadline <= end
        {
            let now = self.ctl.host().now();
            self.ctl.host_mut().advance(deadline.saturating_duration_since(now));
            self.flush();
            self.ctl.poll_timers();
            self.flush();
        }
        let now = self.ctl.host().now();
        self.ctl.host_mut().advance(end.saturating_duration_since(now));
        self.ctl.poll_timers();
    }

    /// A widget in the current menu by name, else anywhere in the scene.
    fn widget(&self, name: &str) -> Result<WidgetId> {
        let scene = self.ctl.host();
        self.ctl
            .presenter()
            .current()
            .and_then(|m| scene.find_child(m.id, name))
            .or_else(|| scene.id(name))
            .ok_or_else(|| Error::script(format!("no widget named {name:?}")))
    }

    fn flush(&mut self) {
        let t = self
            .ctl
            .host()
            .now()
            .saturating_duration_since(self.start)
            .as_millis();
        for call in self.ctl.host_mut().take_calls() {
            self.lines.push(format!("{t:>6}ms  call   {call}"));
        }
        while let Ok(ev) = self.events.try_recv() {
            let text = self.describe(&ev);
            debug!(event = %text, "controller_event");
            self.lines.push(format!("{t:>6}ms  event  {text}"));
        }
    }

    fn describe(&self, ev: &ControllerEvent) -> String {
        match ev {
            ControllerEvent::ActivationPressed => "activation_pressed".to_string(),
            ControllerEvent::ActivationReleased => "activation_released".to_string(),
            ControllerEvent::MenuShown(id) => format!("menu_shown {id}"),
            ControllerEvent::Hidden => "hidden".to_string(),
            ControllerEvent::ActionFired(w) => {
                let name = self.ctl.host().widget_name(*w);
                format!("action_fired {}", name.unwrap_or_else(|| w.to_string()))
            }
        }
    }
}
