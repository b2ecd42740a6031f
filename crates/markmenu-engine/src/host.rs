//! Host capabilities consumed by the controller.
//!
//! The controller never talks to a widget toolkit directly. Everything it
//! needs (geometry, hit testing, mouse capture, popups, window dimming and
//! menu loading) goes through [`Toolkit`] and [`UiProvider`]. Mutating calls
//! return [`HostResult`] so a widget that vanished mid-gesture can be
//! reported without the controller ever failing.

use std::{fmt, time::Instant};

use menu_keys::{Button, Buttons};
use serde::{Deserialize, Serialize};

use crate::{
    error::HostError,
    geom::{Point, Rect},
    menu::{MenuId, MenuNode},
};

/// Result of a host call.
pub type HostResult<T> = Result<T, HostError>;

/// Opaque widget handle issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a widget does when released on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetKind {
    /// Groups other widgets; release resolves to the child at the cursor.
    Container,
    /// Opens another menu. Hovering schedules a submenu transition.
    Launcher {
        /// Menu the launcher opens.
        target: MenuId,
    },
    /// An ordinary clickable control.
    Action,
    /// A checkable control; flipped on hover inside a submenu.
    Toggle,
    /// Labels, backgrounds and anything else without an action.
    Inert,
}

/// Synthetic mouse event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseAction {
    /// Button went down.
    Press,
    /// Button went up.
    Release,
}

/// A mouse event injected into a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticMouse {
    /// Press or release.
    pub action: MouseAction,
    /// Position relative to the target widget.
    pub local: Point,
    /// Position in screen coordinates.
    pub global: Point,
    /// The button that changed state.
    pub button: Button,
    /// Full mask of buttons held after the event.
    pub buttons: Buttons,
}

/// Where a standalone window should appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPos {
    /// At the current cursor.
    Cursor,
    /// At an explicit global position.
    At(Point),
}

/// Widget toolkit operations.
///
/// Queries take `&self` and must not fail: a missing widget is `None`.
pub trait Toolkit {
    /// Monotonic clock used for every timer deadline.
    fn now(&self) -> Instant;
    /// Global cursor position.
    fn cursor_pos(&self) -> Point;

    /// The overlay widget.
    fn overlay(&self) -> WidgetId;
    /// Whether the overlay is currently shown.
    fn overlay_visible(&self) -> bool;
    /// Show the overlay full-screen.
    fn show_overlay(&mut self) -> HostResult<()>;
    /// Hide the overlay.
    fn hide_overlay(&mut self) -> HostResult<()>;
    /// Raise the overlay and give it keyboard focus.
    fn activate_overlay(&mut self) -> HostResult<()>;
    /// Return focus to the window that was active before the overlay.
    fn restore_focus(&mut self) -> HostResult<()>;

    /// Topmost visible widget under a global point.
    fn widget_at(&self, p: Point) -> Option<WidgetId>;
    /// Deepest descendant of `container` under a global point.
    fn child_at(&self, container: WidgetId, p: Point) -> Option<WidgetId>;
    /// Global rectangle of a widget.
    fn widget_rect(&self, w: WidgetId) -> Option<Rect>;
    /// Object name of a widget.
    fn widget_name(&self, w: WidgetId) -> Option<String>;
    /// Behavioural classification of a widget.
    fn widget_kind(&self, w: WidgetId) -> Option<WidgetKind>;
    /// True if `ancestor` is `w` or one of its parents.
    fn is_ancestor_of(&self, ancestor: WidgetId, w: WidgetId) -> bool;
    /// Descendant of `parent` with the given object name.
    fn find_child(&self, parent: WidgetId, name: &str) -> Option<WidgetId>;

    /// Widget currently holding the mouse grab.
    fn mouse_grabber(&self) -> Option<WidgetId>;
    /// Route all mouse input to `w`.
    fn grab_mouse(&mut self, w: WidgetId) -> HostResult<()>;
    /// Drop the grab held by `w`.
    fn release_mouse(&mut self, w: WidgetId) -> HostResult<()>;
    /// Deliver a synthetic mouse event.
    fn send_mouse(&mut self, target: WidgetId, ev: SyntheticMouse) -> HostResult<()>;

    /// Innermost open popup of the active popup chain.
    fn active_popup(&self) -> Option<WidgetId>;
    /// Every visible popup-type top-level widget.
    fn visible_popups(&self) -> Vec<WidgetId>;
    /// Close a popup.
    fn close_popup(&mut self, w: WidgetId) -> HostResult<()>;

    /// Every visible top-level window.
    fn visible_windows(&self) -> Vec<WidgetId>;
    /// Current opacity of a window.
    fn window_opacity(&self, w: WidgetId) -> Option<f32>;
    /// Change a window's opacity.
    fn set_window_opacity(&mut self, w: WidgetId, opacity: f32) -> HostResult<()>;
    /// Let mouse input pass through a window.
    fn set_mouse_transparent(&mut self, w: WidgetId, transparent: bool) -> HostResult<()>;

    /// Make a widget visible.
    fn show_widget(&mut self, w: WidgetId) -> HostResult<()>;
    /// Hide a widget.
    fn hide_widget(&mut self, w: WidgetId) -> HostResult<()>;
    /// Raise a widget above its siblings.
    fn raise_widget(&mut self, w: WidgetId) -> HostResult<()>;
    /// Move a widget so its top-left corner is at a global point.
    fn move_widget(&mut self, w: WidgetId, top_left: Point) -> HostResult<()>;

    /// Unpin a menu's header so it follows the next gesture.
    fn reset_pin_state(&mut self, menu: WidgetId) -> HostResult<()>;
    /// Flip a checkable control.
    fn toggle(&mut self, w: WidgetId) -> HostResult<()>;
    /// Show a standalone (non-radial) menu as its own window.
    fn show_window(&mut self, menu: &MenuNode, pos: WindowPos) -> HostResult<()>;
}

/// Loads menus by identifier.
pub trait UiProvider {
    /// Look up a menu. `None` is a resolution miss, never an error.
    fn get_ui(&mut self, name: &MenuId) -> Option<MenuNode>;
    /// One-time setup before a menu is first shown.
    fn init_ui(&mut self, node: &MenuNode) -> HostResult<()>;
}

/// Everything the controller needs from its environment.
pub trait Host: Toolkit + UiProvider {}

impl<T: Toolkit + UiProvider> Host for T {}

/// Log a failed host call and carry on.
pub fn soft<T>(op: &str, r: HostResult<T>) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(op, error = %e, "host_call_failed");
            None
        }
    }
}
