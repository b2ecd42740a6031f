#![allow(dead_code)]

use std::time::Duration;

use markmenu_engine::{ActivationController, ControllerEvent, Scene, Toolkit, WidgetId};
use menu_config::{Bindings, Config};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing_subscriber::EnvFilter;

/// Two application windows, two start menus, one submenu and a standalone window.
pub const SCENE: &str = r#"(
    screen: (x: 0, y: 0, w: 1600, h: 1000),
    cursor: (x: 800, y: 500),
    windows: [
        (name: "main", rect: (x: 0, y: 0, w: 1200, h: 900), children: [
            (name: "canvas", rect: (x: 0, y: 0, w: 1200, h: 900)),
        ]),
        (name: "tools", rect: (x: 1200, y: 0, w: 400, h: 900)),
    ],
    menus: [
        (name: "start", tags: ["startmenu"], rect: (x: 0, y: 0, w: 300, h: 300), children: [
            (name: "center", rect: (x: 125, y: 125, w: 50, h: 50)),
            (name: "i_edit", rect: (x: 125, y: 0, w: 50, h: 50), kind: Launcher(target: "edit")),
            (name: "btn_copy", rect: (x: 250, y: 125, w: 50, h: 50), kind: Action),
            (name: "btn_prefs", rect: (x: 0, y: 125, w: 50, h: 50), kind: Launcher(target: "prefs#floating")),
        ]),
        (name: "radial_b", tags: ["startmenu"], rect: (x: 0, y: 0, w: 300, h: 300), children: [
            (name: "center", rect: (x: 125, y: 125, w: 50, h: 50)),
            (name: "btn_paste", rect: (x: 250, y: 125, w: 50, h: 50), kind: Action),
        ]),
        (name: "shifted", tags: ["startmenu"], rect: (x: 0, y: 0, w: 300, h: 300)),
        (name: "edit#submenu", rect: (x: 0, y: 0, w: 300, h: 300), children: [
            (name: "center", rect: (x: 125, y: 125, w: 50, h: 50)),
            (name: "i_edit", rect: (x: 125, y: 0, w: 50, h: 50), kind: Launcher(target: "edit")),
            (name: "chk_snap", rect: (x: 0, y: 125, w: 50, h: 50), kind: Toggle),
            (name: "btn_cut", rect: (x: 250, y: 125, w: 50, h: 50), kind: Action),
        ]),
        (name: "prefs", rect: (x: 0, y: 0, w: 400, h: 300)),
    ],
)"#;

/// Route engine logs to the test writer; filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn bindings(entries: &[(&str, &str)]) -> Bindings {
    entries.iter().copied().collect()
}

/// Controller over the demo scene plus its event receiver.
pub struct Harness {
    pub ctl: ActivationController<Scene>,
    pub rx: UnboundedReceiver<ControllerEvent>,
}

impl Harness {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self::with_config(&Config::from_bindings(bindings(entries)))
    }

    pub fn with_config(cfg: &Config) -> Self {
        init_tracing();
        let scene = Scene::from_ron(SCENE).expect("demo scene");
        let (tx, rx) = mpsc::unbounded_channel();
        let ctl = ActivationController::new(scene, cfg).with_events(tx);
        Self { ctl, rx }
    }

    pub fn scene(&self) -> &Scene {
        self.ctl.host()
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.ctl.host_mut()
    }

    /// Drain pending controller events.
    pub fn events(&mut self) -> Vec<ControllerEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.rx.try_recv() {
            out.push(ev);
        }
        out
    }

    pub fn id(&self, name: &str) -> WidgetId {
        self.scene().id(name).expect(name)
    }

    /// Widget `name` inside the menu rooted at `menu`.
    pub fn child(&self, menu: &str, name: &str) -> WidgetId {
        let root = self.id(menu);
        self.scene().find_child(root, name).expect(name)
    }

    /// Move virtual time forward and run due timers.
    pub fn advance(&mut self, n: u64) {
        self.scene_mut().advance(ms(n));
        self.ctl.poll_timers();
    }

    /// Put the cursor on `w` and deliver hover-enter.
    pub fn hover(&mut self, w: WidgetId) {
        self.scene_mut().hover(w);
        self.ctl.hover_enter(w);
    }

    pub fn current(&self) -> Option<String> {
        self.ctl
            .presenter()
            .current()
            .map(|n| n.name.as_str().to_string())
    }
}
