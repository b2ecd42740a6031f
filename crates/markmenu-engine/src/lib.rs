//! Marking-menu engine
//!
//! The input state machine behind a radial menu overlay: holding an
//! activation key (optionally while chording mouse buttons) pops a menu up at
//! the cursor, hovering launchers swaps in submenus, and releasing resolves to
//! a click or nothing.
//!
//! - [`ActivationController`]: the type you construct and drive
//! - [`Toolkit`] / [`UiProvider`]: what the host must provide
//! - [`driver::run`]: a tokio event loop around a controller
//! - [`Scene`]: an in-memory host for tests and simulation
//!
//! The component types (`BindingTable`, `ChordTracker`, …) are exported for
//! inspection and testing; hosts normally only touch the controller.

mod binding;
mod capture;
mod chord;
mod controller;
pub mod driver;
mod error;
mod events;
mod geom;
mod host;
mod menu;
mod presenter;
mod resolver;
mod scene;
mod timer;
mod transition;

pub use binding::BindingTable;
pub use capture::{CaptureOwner, MouseCaptureCoordinator};
pub use chord::{ChordPhase, ChordState, ChordTracker, PendingChordRelease, ReleaseOutcome};
pub use controller::ActivationController;
pub use error::{Error, HostError, Result};
pub use events::{ControllerEvent, EventDispatcher, InputEvent};
pub use geom::{Point, Rect};
pub use host::{
    Host, HostResult, MouseAction, SyntheticMouse, Toolkit, UiProvider, WidgetId, WidgetKind,
    WindowPos,
};
pub use menu::{MenuId, MenuNode, RADIAL_TAGS, TAG_STARTMENU, TAG_SUBMENU, Taggable};
pub use presenter::{OverlayPresenter, Placement};
pub use resolver::{Resolution, WidgetActionResolver};
pub use scene::{MenuSpec, NodeSpec, Scene, SceneSpec};
pub use timer::{TimerKind, TimerQueue};
pub use transition::{PendingTransition, TransitionScheduler};
