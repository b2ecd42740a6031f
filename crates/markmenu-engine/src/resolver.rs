//! Release-time classification of the widget under the cursor.

use tracing::trace;

use crate::{
    geom::Point,
    host::{Toolkit, WidgetId, WidgetKind},
    menu::{MenuId, RADIAL_TAGS},
};

/// What a release over a widget should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Show another menu. Unknown tags are already stripped.
    Launch {
        /// Launcher that was released on.
        widget: WidgetId,
        /// Menu to show.
        target: MenuId,
    },
    /// Hand the click to an ordinary control.
    Activate {
        /// The control.
        widget: WidgetId,
    },
    /// Nothing to do here.
    Inert,
}

/// Classifies widgets at release time.
pub struct WidgetActionResolver;

impl WidgetActionResolver {
    /// Resolve containers to the interactive child at `cursor`.
    pub fn resolve_target<T: Toolkit + ?Sized>(host: &T, widget: WidgetId, cursor: Point) -> Option<WidgetId> {
        match host.widget_kind(widget)? {
            WidgetKind::Container => host.child_at(widget, cursor),
            _ => Some(widget),
        }
    }

    /// Classify the widget at `cursor`, starting from `widget`.
    pub fn classify<T: Toolkit + ?Sized>(host: &T, widget: WidgetId, cursor: Point) -> Resolution {
        let Some(target) = Self::resolve_target(host, widget, cursor) else {
            return Resolution::Inert;
        };
        let out = match host.widget_kind(target) {
            Some(WidgetKind::Launcher { target: menu }) => Resolution::Launch {
                widget: target,
                target: menu.retain_tags(&RADIAL_TAGS),
            },
            Some(WidgetKind::Action) => Resolution::Activate { widget: target },
            Some(WidgetKind::Toggle | WidgetKind::Inert | WidgetKind::Container) | None => {
                Resolution::Inert
            }
        };
        trace!(widget = %target, ?out, "release_classified");
        out
    }
}
