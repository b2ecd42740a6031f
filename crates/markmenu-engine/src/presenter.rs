//! Overlay presentation: which menu is up, where, and what is dimmed.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    mem,
};

use menu_config::OverlayOpts;
use tracing::debug;

use crate::{
    geom::Point,
    host::{Host, Toolkit, WidgetId, WindowPos, soft},
    menu::{MenuId, MenuNode, TAG_STARTMENU, Taggable},
    transition::TransitionScheduler,
};

/// Where to put a menu being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Centered at the gesture origin (the cursor for a fresh gesture).
    Cursor,
    /// Aligned so the widget named like `source` stays under the cursor.
    Anchor {
        /// Launcher the transition started from.
        source: WidgetId,
    },
    /// Centered at an explicit point; standalone windows open there.
    At(Point),
}

/// Shows and hides menus inside the overlay and dims other windows.
#[derive(Debug)]
pub struct OverlayPresenter {
    current: Option<MenuNode>,
    /// Dimmed window → opacity before dimming.
    dimmed: BTreeMap<WidgetId, f32>,
    cache: HashMap<MenuId, MenuNode>,
    initialized: HashSet<MenuId>,
    start_pos: Option<Point>,
    opts: OverlayOpts,
}

impl OverlayPresenter {
    /// Presenter with nothing shown.
    pub fn new(opts: OverlayOpts) -> Self {
        Self {
            current: None,
            dimmed: BTreeMap::new(),
            cache: HashMap::new(),
            initialized: HashSet::new(),
            start_pos: None,
            opts,
        }
    }

    /// Replace the presentation knobs.
    pub fn set_opts(&mut self, opts: OverlayOpts) {
        self.opts = opts;
    }

    /// The radial menu currently inside the overlay.
    pub fn current(&self) -> Option<&MenuNode> {
        self.current.as_ref()
    }

    /// Cursor position when the current start menu was shown.
    pub fn start_pos(&self) -> Option<Point> {
        self.start_pos
    }

    /// Number of memoized menus.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// True if `w` is dimmed by us.
    pub fn is_dimmed(&self, w: WidgetId) -> bool {
        self.dimmed.contains_key(&w)
    }

    /// Look up a menu, running the provider's first-use setup once.
    ///
    /// Radial menus are memoized; a miss is logged and returns `None`.
    pub fn resolve<H: Host + ?Sized>(&mut self, host: &mut H, name: &MenuId) -> Option<MenuNode> {
        let node = match self.cache.get(name) {
            Some(n) => n.clone(),
            None => {
                let Some(n) = host.get_ui(name) else {
                    debug!(menu = %name, "menu_not_found");
                    return None;
                };
                n
            }
        };
        if self.initialized.insert(node.name.clone()) {
            soft("init_ui", host.init_ui(&node));
        }
        if node.is_radial() {
            self.cache.insert(name.clone(), node.clone());
        }
        Some(node)
    }

    /// Show a menu. Returns the node shown, or `None` on a resolution miss.
    pub fn show<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        name: &MenuId,
        placement: Placement,
    ) -> Option<MenuNode> {
        let node = self.resolve(host, name)?;
        if node.is_radial() {
            self.show_radial(host, &node, placement);
        } else {
            self.show_standalone(host, &node, placement);
        }
        Some(node)
    }

    fn show_radial<H: Host + ?Sized>(&mut self, host: &mut H, node: &MenuNode, placement: Placement) {
        let cursor = host.cursor_pos();
        let top_left = match placement {
            Placement::Anchor { source } => {
                TransitionScheduler::anchor_delta(host, source, node.id)
                    .zip(host.widget_rect(node.id))
                    .map(|(delta, r)| r.origin() + delta)
            }
            Placement::Cursor => {
                let origin = self
                    .start_pos
                    .filter(|_| host.overlay_visible())
                    .unwrap_or(cursor);
                host.widget_rect(node.id).map(|r| r.centered_at(origin).origin())
            }
            Placement::At(p) => host.widget_rect(node.id).map(|r| r.centered_at(p).origin()),
        };

        if let Some(prev) = self.current.take()
            && prev.id != node.id
        {
            soft("hide_widget", host.hide_widget(prev.id));
        }
        if let Some(p) = top_left {
            soft("move_widget", host.move_widget(node.id, p));
        }
        soft("show_widget", host.show_widget(node.id));
        soft("raise_widget", host.raise_widget(node.id));
        if node.has_tag(TAG_STARTMENU) && self.start_pos.is_none() {
            self.start_pos = Some(cursor);
        }
        if !host.overlay_visible() {
            soft("show_overlay", host.show_overlay());
        }
        soft("activate_overlay", host.activate_overlay());
        self.current = Some(node.clone());
        debug!(menu = %node.name, "radial_shown");
    }

    fn show_standalone<H: Host + ?Sized>(&mut self, host: &mut H, node: &MenuNode, placement: Placement) {
        self.hide(host);
        let pos = match placement {
            Placement::At(p) => WindowPos::At(p),
            Placement::Cursor | Placement::Anchor { .. } => WindowPos::Cursor,
        };
        soft("show_window", host.show_window(node, pos));
        debug!(menu = %node.name, "window_shown");
    }

    /// Hide the current menu and the overlay, and undim windows.
    ///
    /// Returns whether the overlay was visible. Calling it again is a no-op.
    pub fn hide<T: Toolkit + ?Sized>(&mut self, host: &mut T) -> bool {
        let was_visible = host.overlay_visible();
        if let Some(cur) = self.current.take() {
            soft("reset_pin_state", host.reset_pin_state(cur.id));
            soft("hide_widget", host.hide_widget(cur.id));
        }
        if was_visible {
            soft("hide_overlay", host.hide_overlay());
            soft("restore_focus", host.restore_focus());
            debug!("overlay_hidden");
        }
        self.restore_other_windows(host);
        self.start_pos = None;
        if self.cache.len() > self.opts.submenu_cache_limit {
            debug!(entries = self.cache.len(), "menu_cache_purged");
            self.cache.clear();
        }
        was_visible
    }

    /// Fade and click-through every other visible top-level window.
    pub fn dim_other_windows<T: Toolkit + ?Sized>(&mut self, host: &mut T) {
        let overlay = host.overlay();
        for w in host.visible_windows() {
            if w == overlay || host.is_ancestor_of(overlay, w) || self.dimmed.contains_key(&w) {
                continue;
            }
            let prev = host.window_opacity(w).unwrap_or(1.0);
            if soft(
                "set_window_opacity",
                host.set_window_opacity(w, self.opts.dim_opacity),
            )
            .is_some()
            {
                soft("set_mouse_transparent", host.set_mouse_transparent(w, true));
                self.dimmed.insert(w, prev);
            }
        }
        if !self.dimmed.is_empty() {
            debug!(count = self.dimmed.len(), "windows_dimmed");
        }
    }

    /// Undo [`dim_other_windows`](Self::dim_other_windows) for the windows it touched.
    pub fn restore_other_windows<T: Toolkit + ?Sized>(&mut self, host: &mut T) {
        for (w, prev) in mem::take(&mut self.dimmed) {
            soft("set_window_opacity", host.set_window_opacity(w, prev));
            soft("set_mouse_transparent", host.set_mouse_transparent(w, false));
        }
    }
}
