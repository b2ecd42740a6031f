//! In-memory host.
//!
//! `Scene` models just enough of a widget toolkit for the controller to run
//! against: a widget tree with geometry and z-order, a cursor, an implicit
//! and explicit mouse grab, a popup chain, window opacity and a clock. Every
//! mutating call is appended to a call log, and individual operations can be
//! told to fail. It backs both the test suite and the `markmenu-sim` replay
//! tool, which loads scenes from RON via [`SceneSpec`].

use std::{
    collections::{BTreeMap, BTreeSet},
    mem,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio::time::Instant as TokioInstant;
use tracing::trace;

use crate::{
    Error, Result,
    error::HostError,
    geom::{Point, Rect},
    host::{HostResult, MouseAction, SyntheticMouse, Toolkit, UiProvider, WidgetId, WidgetKind, WindowPos},
    menu::{MenuId, MenuNode, RADIAL_TAGS},
};

/// Declarative widget description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Object name.
    pub name: String,
    /// Geometry relative to the parent (global for top-level windows).
    pub rect: Rect,
    /// Behaviour on release.
    #[serde(default = "inert")]
    pub kind: WidgetKind,
    /// Whether the widget starts visible.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Popup-type top-level; visible popups form the active popup chain.
    #[serde(default)]
    pub popup: bool,
    /// Child widgets.
    #[serde(default)]
    pub children: Vec<Self>,
}

/// Declarative menu description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSpec {
    /// Identifier, optionally with `#tag` suffixes.
    pub name: String,
    /// Extra tags declared by the provider.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Geometry; relative to the overlay for radial menus.
    pub rect: Rect,
    /// Menu content.
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// Declarative scene description, as loaded by `markmenu-sim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSpec {
    /// Screen geometry; the overlay covers it.
    pub screen: Rect,
    /// Initial cursor.
    #[serde(default)]
    pub cursor: Point,
    /// Application windows and popups, bottom to top.
    #[serde(default)]
    pub windows: Vec<NodeSpec>,
    /// Loadable menus.
    #[serde(default)]
    pub menus: Vec<MenuSpec>,
}

fn inert() -> WidgetKind {
    WidgetKind::Inert
}

fn yes() -> bool {
    true
}

/// Time source for a scene.
#[derive(Debug, Clone, Copy)]
enum Clock {
    /// Advanced explicitly with [`Scene::advance`].
    Manual(Instant),
    /// Follows tokio's clock, which tests may pause.
    Tokio,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<WidgetId>,
    rect: Rect,
    kind: WidgetKind,
    visible: bool,
    popup: bool,
    z: u64,
    opacity: f32,
    transparent: bool,
    checked: bool,
}

/// In-memory widget toolkit and UI provider.
#[derive(Debug)]
pub struct Scene {
    nodes: BTreeMap<WidgetId, Node>,
    /// Declared menu name → (root widget, declared tags).
    menus: BTreeMap<String, (WidgetId, Vec<String>)>,
    overlay: WidgetId,
    cursor: Point,
    clock: Clock,
    grabber: Option<WidgetId>,
    /// Target of the last synthetic press, for click detection.
    pressed: Option<WidgetId>,
    popup_chain: Vec<WidgetId>,
    calls: Vec<String>,
    failing: BTreeSet<String>,
    next_id: u64,
    next_z: u64,
}

impl Scene {
    /// Empty scene with a hidden overlay covering `screen`.
    pub fn new(screen: Rect) -> Self {
        let mut s = Self {
            nodes: BTreeMap::new(),
            menus: BTreeMap::new(),
            overlay: WidgetId(0),
            cursor: screen.center(),
            clock: Clock::Manual(Instant::now()),
            grabber: None,
            pressed: None,
            popup_chain: Vec::new(),
            calls: Vec::new(),
            failing: BTreeSet::new(),
            next_id: 0,
            next_z: 0,
        };
        s.overlay = s.insert(None, "overlay", screen, WidgetKind::Inert, false);
        s
    }

    /// Build a scene from its description.
    pub fn from_spec(spec: &SceneSpec) -> Self {
        let mut s = Self::new(spec.screen);
        s.cursor = spec.cursor;
        for w in &spec.windows {
            s.add_node(None, w);
        }
        for m in &spec.menus {
            let tags: Vec<&str> = m.tags.iter().map(String::as_str).collect();
            let id = s.add_menu(&m.name, &tags, m.rect);
            for c in &m.children {
                s.add_node(Some(id), c);
            }
        }
        s
    }

    /// Parse a RON scene description.
    pub fn from_ron(text: &str) -> Result<Self> {
        let spec: SceneSpec = ron::from_str(text).map_err(|e| Error::Scene(e.to_string()))?;
        Ok(Self::from_spec(&spec))
    }

    /// Follow tokio's clock instead of the manual one.
    pub fn with_tokio_clock(mut self) -> Self {
        self.clock = Clock::Tokio;
        self
    }

    /// Add a widget under `parent`, or a top-level window when `parent` is `None`.
    pub fn add_widget(
        &mut self,
        parent: Option<WidgetId>,
        name: &str,
        rect: Rect,
        kind: WidgetKind,
    ) -> WidgetId {
        self.insert(parent, name, rect, kind, true)
    }

    /// Add a visible popup on top of the popup chain.
    pub fn add_popup(&mut self, name: &str, rect: Rect) -> WidgetId {
        let id = self.insert(None, name, rect, WidgetKind::Inert, true);
        if let Some(n) = self.nodes.get_mut(&id) {
            n.popup = true;
        }
        self.popup_chain.push(id);
        id
    }

    /// Register a loadable menu.
    ///
    /// Radial menus (tagged `startmenu` or `submenu`, in the name or in
    /// `tags`) live inside the overlay; anything else is a hidden top-level
    /// window.
    pub fn add_menu(&mut self, name: &str, tags: &[&str], rect: Rect) -> WidgetId {
        let node = MenuNode::new(WidgetId(0), MenuId::from(name));
        let radial = node
            .name
            .tags()
            .chain(tags.iter().copied())
            .any(|t| RADIAL_TAGS.contains(&t));
        let parent = radial.then_some(self.overlay);
        let id = self.insert(parent, name, rect, WidgetKind::Container, false);
        self.menus.insert(
            name.to_string(),
            (id, tags.iter().map(|t| t.to_string()).collect()),
        );
        id
    }

    fn add_node(&mut self, parent: Option<WidgetId>, spec: &NodeSpec) -> WidgetId {
        let id = self.insert(parent, &spec.name, spec.rect, spec.kind.clone(), spec.visible);
        if spec.popup {
            if let Some(n) = self.nodes.get_mut(&id) {
                n.popup = true;
            }
            if spec.visible {
                self.popup_chain.push(id);
            }
        }
        for c in &spec.children {
            self.add_node(Some(id), c);
        }
        id
    }

    fn insert(
        &mut self,
        parent: Option<WidgetId>,
        name: &str,
        rect: Rect,
        kind: WidgetKind,
        visible: bool,
    ) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.next_z += 1;
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent,
                rect,
                kind,
                visible,
                popup: false,
                z: self.next_z,
                opacity: 1.0,
                transparent: false,
                checked: false,
            },
        );
        id
    }

    /// Destroy a widget and its descendants, as if the host deleted it mid-gesture.
    pub fn remove_widget(&mut self, w: WidgetId) {
        let doomed: Vec<WidgetId> = self
            .nodes
            .keys()
            .copied()
            .filter(|c| self.is_ancestor_of(w, *c))
            .collect();
        for d in doomed {
            self.nodes.remove(&d);
        }
        self.popup_chain.retain(|p| self.nodes.contains_key(p));
        self.menus.retain(|_, (id, _)| *id != w);
    }

    /// First widget with the given object name.
    pub fn id(&self, name: &str) -> Option<WidgetId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    /// Whether a widget and all its parents are visible.
    pub fn is_shown(&self, w: WidgetId) -> bool {
        let mut cur = Some(w);
        while let Some(id) = cur {
            match self.nodes.get(&id) {
                Some(n) if n.visible => cur = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// Opacity and mouse transparency of a widget.
    pub fn window_state(&self, w: WidgetId) -> Option<(f32, bool)> {
        self.nodes.get(&w).map(|n| (n.opacity, n.transparent))
    }

    /// Check state of a toggle.
    pub fn is_checked(&self, w: WidgetId) -> bool {
        self.nodes.get(&w).is_some_and(|n| n.checked)
    }

    /// Move the cursor.
    pub fn set_cursor(&mut self, p: Point) {
        self.cursor = p;
    }

    /// Move the cursor to the center of a widget.
    pub fn hover(&mut self, w: WidgetId) {
        if let Some(r) = self.widget_rect(w) {
            self.cursor = r.center();
        }
    }

    /// Advance the manual clock. No effect on a tokio-driven scene.
    pub fn advance(&mut self, d: Duration) {
        if let Clock::Manual(t) = &mut self.clock {
            *t += d;
        }
    }

    /// Make every subsequent call of `op` fail.
    pub fn fail(&mut self, op: &str) {
        self.failing.insert(op.to_string());
    }

    /// Undo [`fail`](Self::fail).
    pub fn heal(&mut self, op: &str) {
        self.failing.remove(op);
    }

    /// The call log.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<String> {
        mem::take(&mut self.calls)
    }

    /// True if the log holds exactly `s`.
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.iter().any(|c| c == s)
    }

    /// Number of logged calls starting with `prefix`.
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn note(&mut self, s: String) {
        trace!(call = %s, "scene_call");
        self.calls.push(s);
    }

    fn label(&self, w: WidgetId) -> String {
        self.nodes
            .get(&w)
            .map_or_else(|| format!("#{w}"), |n| n.name.clone())
    }

    fn check(&self, op: &'static str, w: WidgetId) -> HostResult<()> {
        if self.failing.contains(op) {
            return Err(HostError::failed(op, "injected failure"));
        }
        if !self.nodes.contains_key(&w) {
            return Err(HostError::Gone(w));
        }
        Ok(())
    }

    fn node_mut(&mut self, w: WidgetId) -> HostResult<&mut Node> {
        self.nodes.get_mut(&w).ok_or(HostError::Gone(w))
    }

    fn depth(&self, w: WidgetId) -> usize {
        let mut d = 0;
        let mut cur = self.nodes.get(&w).and_then(|n| n.parent);
        while let Some(p) = cur {
            d += 1;
            cur = self.nodes.get(&p).and_then(|n| n.parent);
        }
        d
    }

    fn top_level_z(&self, w: WidgetId) -> u64 {
        let mut cur = w;
        while let Some(p) = self.nodes.get(&cur).and_then(|n| n.parent) {
            cur = p;
        }
        self.nodes.get(&cur).map_or(0, |n| n.z)
    }

    /// Stacking key: top-level window first, then sibling z, then depth.
    fn stacking(&self, w: WidgetId) -> (u64, usize, u64) {
        let z = self.nodes.get(&w).map_or(0, |n| n.z);
        (self.top_level_z(w), self.depth(w), z)
    }

    fn hit(&self, w: WidgetId, p: Point) -> bool {
        self.is_shown(w) && self.widget_rect(w).is_some_and(|r| r.contains(p))
    }
}

impl Toolkit for Scene {
    fn now(&self) -> Instant {
        match self.clock {
            Clock::Manual(t) => t,
            Clock::Tokio => TokioInstant::now().into_std(),
        }
    }

    fn cursor_pos(&self) -> Point {
        self.cursor
    }

    fn overlay(&self) -> WidgetId {
        self.overlay
    }

    fn overlay_visible(&self) -> bool {
        self.nodes.get(&self.overlay).is_some_and(|n| n.visible)
    }

    fn show_overlay(&mut self) -> HostResult<()> {
        self.check("show_overlay", self.overlay)?;
        self.next_z += 1;
        let z = self.next_z;
        let n = self.node_mut(self.overlay)?;
        n.visible = true;
        n.z = z;
        self.note("show_overlay".into());
        Ok(())
    }

    fn hide_overlay(&mut self) -> HostResult<()> {
        self.check("hide_overlay", self.overlay)?;
        self.node_mut(self.overlay)?.visible = false;
        if self.grabber == Some(self.overlay) {
            self.grabber = None;
        }
        self.note("hide_overlay".into());
        Ok(())
    }

    fn activate_overlay(&mut self) -> HostResult<()> {
        self.check("activate_overlay", self.overlay)?;
        self.note("activate_overlay".into());
        Ok(())
    }

    fn restore_focus(&mut self) -> HostResult<()> {
        if self.failing.contains("restore_focus") {
            return Err(HostError::failed("restore_focus", "injected failure"));
        }
        self.note("restore_focus".into());
        Ok(())
    }

    fn widget_at(&self, p: Point) -> Option<WidgetId> {
        let overlay_up = self.overlay_visible();
        self.nodes
            .keys()
            .copied()
            .filter(|w| self.is_ancestor_of(self.overlay, *w) == overlay_up)
            .filter(|w| self.hit(*w, p))
            .max_by_key(|w| self.stacking(*w))
    }

    fn child_at(&self, container: WidgetId, p: Point) -> Option<WidgetId> {
        self.nodes
            .keys()
            .copied()
            .filter(|w| *w != container && self.is_ancestor_of(container, *w))
            .filter(|w| self.hit(*w, p))
            .max_by_key(|w| self.stacking(*w))
    }

    fn widget_rect(&self, w: WidgetId) -> Option<Rect> {
        let n = self.nodes.get(&w)?;
        match n.parent {
            Some(p) => Some(n.rect.translate(self.widget_rect(p)?.origin())),
            None => Some(n.rect),
        }
    }

    fn widget_name(&self, w: WidgetId) -> Option<String> {
        self.nodes.get(&w).map(|n| n.name.clone())
    }

    fn widget_kind(&self, w: WidgetId) -> Option<WidgetKind> {
        self.nodes.get(&w).map(|n| n.kind.clone())
    }

    fn is_ancestor_of(&self, ancestor: WidgetId, w: WidgetId) -> bool {
        let mut cur = Some(w);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn find_child(&self, parent: WidgetId, name: &str) -> Option<WidgetId> {
        self.nodes
            .iter()
            .find(|(id, n)| n.name == name && **id != parent && self.is_ancestor_of(parent, **id))
            .map(|(id, _)| *id)
    }

    fn mouse_grabber(&self) -> Option<WidgetId> {
        self.grabber
    }

    fn grab_mouse(&mut self, w: WidgetId) -> HostResult<()> {
        self.check("grab_mouse", w)?;
        self.grabber = Some(w);
        self.note(format!("grab_mouse:{}", self.label(w)));
        Ok(())
    }

    fn release_mouse(&mut self, w: WidgetId) -> HostResult<()> {
        self.check("release_mouse", w)?;
        if self.grabber == Some(w) {
            self.grabber = None;
        }
        self.note(format!("release_mouse:{}", self.label(w)));
        Ok(())
    }

    fn send_mouse(&mut self, target: WidgetId, ev: SyntheticMouse) -> HostResult<()> {
        self.check("send_mouse", target)?;
        let action = match ev.action {
            MouseAction::Press => "press",
            MouseAction::Release => "release",
        };
        self.note(format!(
            "send_mouse:{action}:{}:{}",
            ev.button.to_spec(),
            self.label(target)
        ));
        match ev.action {
            MouseAction::Press => {
                self.grabber.get_or_insert(target);
                self.pressed = Some(target);
            }
            MouseAction::Release => {
                if self.grabber == Some(target) {
                    self.grabber = None;
                }
                if self.pressed.take() == Some(target)
                    && matches!(self.widget_kind(target), Some(WidgetKind::Action))
                {
                    self.note(format!("clicked:{}", self.label(target)));
                }
            }
        }
        Ok(())
    }

    fn active_popup(&self) -> Option<WidgetId> {
        self.popup_chain
            .iter()
            .rev()
            .copied()
            .find(|p| self.is_shown(*p))
    }

    fn visible_popups(&self) -> Vec<WidgetId> {
        self.nodes
            .iter()
            .filter(|(id, n)| n.popup && self.is_shown(**id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn close_popup(&mut self, w: WidgetId) -> HostResult<()> {
        self.check("close_popup", w)?;
        self.node_mut(w)?.visible = false;
        self.popup_chain.retain(|p| *p != w);
        if self.grabber == Some(w) {
            self.grabber = None;
        }
        self.note(format!("close_popup:{}", self.label(w)));
        Ok(())
    }

    fn visible_windows(&self) -> Vec<WidgetId> {
        self.nodes
            .iter()
            .filter(|(id, n)| n.parent.is_none() && !n.popup && self.is_shown(**id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn window_opacity(&self, w: WidgetId) -> Option<f32> {
        self.nodes.get(&w).map(|n| n.opacity)
    }

    fn set_window_opacity(&mut self, w: WidgetId, opacity: f32) -> HostResult<()> {
        self.check("set_window_opacity", w)?;
        self.node_mut(w)?.opacity = opacity;
        self.note(format!("set_window_opacity:{}:{opacity}", self.label(w)));
        Ok(())
    }

    fn set_mouse_transparent(&mut self, w: WidgetId, transparent: bool) -> HostResult<()> {
        self.check("set_mouse_transparent", w)?;
        self.node_mut(w)?.transparent = transparent;
        self.note(format!(
            "set_mouse_transparent:{}:{transparent}",
            self.label(w)
        ));
        Ok(())
    }

    fn show_widget(&mut self, w: WidgetId) -> HostResult<()> {
        self.check("show_widget", w)?;
        self.node_mut(w)?.visible = true;
        self.note(format!("show_widget:{}", self.label(w)));
        Ok(())
    }

    fn hide_widget(&mut self, w: WidgetId) -> HostResult<()> {
        self.check("hide_widget", w)?;
        self.node_mut(w)?.visible = false;
        self.note(format!("hide_widget:{}", self.label(w)));
        Ok(())
    }

    fn raise_widget(&mut self, w: WidgetId) -> HostResult<()> {
        self.check("raise_widget", w)?;
        self.next_z += 1;
        let z = self.next_z;
        self.node_mut(w)?.z = z;
        self.note(format!("raise_widget:{}", self.label(w)));
        Ok(())
    }

    fn move_widget(&mut self, w: WidgetId, top_left: Point) -> HostResult<()> {
        self.check("move_widget", w)?;
        let parent_origin = self
            .nodes
            .get(&w)
            .and_then(|n| n.parent)
            .and_then(|p| self.widget_rect(p))
            .map_or(Point::default(), |r| r.origin());
        let n = self.node_mut(w)?;
        let local = top_left - parent_origin;
        n.rect.x = local.x;
        n.rect.y = local.y;
        self.note(format!(
            "move_widget:{}:{},{}",
            self.label(w),
            top_left.x,
            top_left.y
        ));
        Ok(())
    }

    fn reset_pin_state(&mut self, menu: WidgetId) -> HostResult<()> {
        self.check("reset_pin_state", menu)?;
        self.note(format!("reset_pin_state:{}", self.label(menu)));
        Ok(())
    }

    fn toggle(&mut self, w: WidgetId) -> HostResult<()> {
        self.check("toggle", w)?;
        let n = self.node_mut(w)?;
        n.checked = !n.checked;
        let checked = n.checked;
        self.note(format!("toggle:{}:{checked}", self.label(w)));
        Ok(())
    }

    fn show_window(&mut self, menu: &MenuNode, pos: WindowPos) -> HostResult<()> {
        self.check("show_window", menu.id)?;
        let top_left = match pos {
            WindowPos::Cursor => self.cursor,
            WindowPos::At(p) => p,
        };
        self.next_z += 1;
        let z = self.next_z;
        let n = self.node_mut(menu.id)?;
        n.visible = true;
        n.z = z;
        n.rect.x = top_left.x;
        n.rect.y = top_left.y;
        self.note(format!(
            "show_window:{}:{},{}",
            menu.name, top_left.x, top_left.y
        ));
        Ok(())
    }
}

impl UiProvider for Scene {
    fn get_ui(&mut self, name: &MenuId) -> Option<MenuNode> {
        let (declared, (id, tags)) = self
            .menus
            .get_key_value(name.as_str())
            .or_else(|| {
                self.menus
                    .iter()
                    .find(|(k, _)| MenuId::from(k.as_str()).base() == name.base())
            })?;
        // Tags come from the declaration; a request for `prefs#submenu`
        // does not turn a standalone window into a radial page.
        let tags = MenuId::from(declared.as_str())
            .tags()
            .chain(tags.iter().map(String::as_str))
            .map(str::to_string)
            .collect();
        Some(MenuNode {
            id: *id,
            name: name.clone(),
            tags,
        })
    }

    fn init_ui(&mut self, node: &MenuNode) -> HostResult<()> {
        self.check("init_ui", node.id)?;
        self.note(format!("init_ui:{}", node.name));
        Ok(())
    }
}
