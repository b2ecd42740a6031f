//! Events in and out of the controller.

use menu_keys::{Buttons, Key, Modifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

use crate::{
    Error, Result,
    geom::Point,
    host::WidgetId,
    menu::MenuId,
};

/// Notifications emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The activation key went down (once per physical press).
    ActivationPressed,
    /// The activation key came up (once per physical release).
    ActivationReleased,
    /// A menu was shown.
    MenuShown(MenuId),
    /// The overlay was hidden.
    Hidden,
    /// A control received its click.
    ActionFired(WidgetId),
}

/// Raw input delivered by the host, one variant per controller entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down.
    KeyPress {
        /// The key.
        key: Key,
        /// Modifiers held.
        modifiers: Modifiers,
        /// Mouse buttons held.
        buttons: Buttons,
        /// Set for auto-repeat.
        repeat: bool,
    },
    /// A key came up.
    KeyRelease {
        /// The key.
        key: Key,
        /// Set for auto-repeat.
        repeat: bool,
    },
    /// A mouse button went down.
    MousePress {
        /// Buttons held after the press.
        buttons: Buttons,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// A mouse button came up.
    MouseRelease {
        /// Buttons still held.
        remaining: Buttons,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// The cursor entered a widget.
    HoverEnter(WidgetId),
    /// The cursor left a widget.
    HoverLeave(WidgetId),
    /// Explicit show request.
    Show {
        /// Menu to show; `None` shows the default menu.
        target: Option<MenuId>,
        /// Position hint.
        hint: Option<Point>,
    },
    /// Explicit hide request.
    Hide,
}

/// Sends controller events to an optional subscriber.
///
/// A closed receiver is logged once and the dispatcher goes quiet; the
/// controller keeps working without a listener.
#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    tx: Option<UnboundedSender<ControllerEvent>>,
}

impl EventDispatcher {
    /// Dispatcher sending on `tx`.
    pub fn new(tx: UnboundedSender<ControllerEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Dispatcher that drops everything.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Send an event.
    pub fn send(&self, ev: ControllerEvent) -> Result<()> {
        trace!(?ev, "controller_event");
        match &self.tx {
            Some(tx) => tx.send(ev).map_err(|_| Error::ChannelClosed),
            None => Ok(()),
        }
    }

    /// Send an event, detaching the subscriber if it has gone away.
    pub fn emit(&mut self, ev: ControllerEvent) {
        if self.send(ev).is_err() {
            debug!("event receiver closed; dropping further events");
            self.tx = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn events_reach_subscriber() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = EventDispatcher::new(tx);
        d.emit(ControllerEvent::ActivationPressed);
        d.emit(ControllerEvent::MenuShown("start".into()));
        assert_eq!(rx.try_recv().ok(), Some(ControllerEvent::ActivationPressed));
        assert_eq!(
            rx.try_recv().ok(),
            Some(ControllerEvent::MenuShown("start".into()))
        );
    }

    #[test]
    fn closed_receiver_detaches() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut d = EventDispatcher::new(tx);
        drop(rx);
        assert!(matches!(
            d.send(ControllerEvent::Hidden),
            Err(Error::ChannelClosed)
        ));
        d.emit(ControllerEvent::Hidden);
        assert!(d.send(ControllerEvent::Hidden).is_ok());
    }
}
