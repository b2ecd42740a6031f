//! Observable bindings store.
//!
//! The store stands in for the host's persistent settings: it owns the
//! current bindings and pushes every change to subscribers through a
//! `tokio::sync::watch` channel, so the controller can rebuild its lookup
//! table without restarting.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::Bindings;

/// Current bindings plus the defaults they revert to.
pub struct BindingsStore {
    /// Bindings restored when an empty table is stored.
    defaults: Bindings,
    /// Change channel; the sender always holds the current value.
    tx: watch::Sender<Bindings>,
}

impl BindingsStore {
    /// Create a store whose current value is `defaults`.
    pub fn new(defaults: Bindings) -> Self {
        let (tx, _rx) = watch::channel(defaults.clone());
        Self { defaults, tx }
    }

    /// Create a store from previously persisted bindings.
    ///
    /// `defaults` only take effect when nothing (or an empty table) was stored.
    pub fn restore(stored: Option<Bindings>, defaults: Bindings) -> Self {
        let store = Self::new(defaults);
        if let Some(stored) = stored {
            store.set(stored);
        }
        store
    }

    /// Snapshot of the current bindings.
    pub fn get(&self) -> Bindings {
        self.tx.borrow().clone()
    }

    /// Replace the bindings and notify subscribers.
    ///
    /// An empty table reverts to the defaults, so a cleared settings file
    /// never leaves the menu without an activation key.
    pub fn set(&self, bindings: Bindings) {
        let next = if bindings.is_empty() && !self.defaults.is_empty() {
            warn!("No bindings found; reverting to default bindings");
            self.defaults.clone()
        } else {
            bindings
        };
        debug!(entries = next.len(), "bindings_store_set");
        self.tx.send_replace(next);
    }

    /// Insert or replace a single entry and notify subscribers.
    pub fn bind(&self, spec: &str, menu: &str) {
        self.tx.send_modify(|b| b.insert(spec, menu));
    }

    /// Subscribe to changes. The receiver starts with the current value marked seen.
    pub fn subscribe(&self) -> watch::Receiver<Bindings> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Bindings {
        [("F12", "start")].into_iter().collect()
    }

    #[test]
    fn set_notifies_subscribers() {
        let store = BindingsStore::new(defaults());
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().expect("open"));

        store.set([("F11", "other")].into_iter().collect());
        assert!(rx.has_changed().expect("open"));
        assert_eq!(rx.borrow_and_update().get("F11"), Some("other"));
    }

    #[test]
    fn empty_reverts_to_defaults() {
        let store = BindingsStore::new(defaults());
        store.set(Bindings::new());
        assert_eq!(store.get(), defaults());
    }

    #[test]
    fn restore_prefers_stored_values() {
        let stored: Bindings = [("F10", "mine")].into_iter().collect();
        let store = BindingsStore::restore(Some(stored.clone()), defaults());
        assert_eq!(store.get(), stored);

        let fresh = BindingsStore::restore(None, defaults());
        assert_eq!(fresh.get(), defaults());
    }

    #[test]
    fn bind_updates_single_entry() {
        let store = BindingsStore::new(defaults());
        let mut rx = store.subscribe();
        store.bind("F12+Shift", "shifted");
        assert!(rx.has_changed().expect("open"));
        assert_eq!(rx.borrow_and_update().len(), 2);
    }
}
