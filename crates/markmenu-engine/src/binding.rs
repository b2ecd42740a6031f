//! Binding table: canonical combination → menu identifier.

use std::collections::HashMap;

use menu_config::Bindings;
use menu_keys::{BindingKey, Buttons, Key, Modifiers, Token};
use tracing::{debug, trace, warn};

use crate::menu::MenuId;

/// Normalized bindings plus the designated activation key.
///
/// Rebuilt from scratch whenever the bindings configuration changes.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    map: HashMap<BindingKey, MenuId>,
    /// First key token seen across the table, in configuration order.
    activation: Option<Key>,
}

impl BindingTable {
    /// Canonical key for a set of token strings.
    pub fn normalize<I, S>(tokens: I) -> BindingKey
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        BindingKey::normalize(tokens)
    }

    /// Build from a raw bindings table.
    ///
    /// A table without any key token still stores its entries but has no
    /// default menu.
    pub fn build(raw: &Bindings) -> Self {
        let mut table = Self::default();
        for (spec, menu) in raw.iter() {
            if table.activation.is_none() {
                table.activation = BindingKey::split_spec(spec)
                    .filter_map(Token::parse)
                    .find_map(Token::as_key);
            }
            let key = BindingKey::parse(spec);
            if key.is_empty() {
                warn!(spec, "binding has no tokens; ignored");
                continue;
            }
            if let Some(prev) = table.map.insert(key.clone(), MenuId::from(menu)) {
                debug!(%key, %prev, menu, "binding_overridden");
            }
        }
        match table.activation {
            Some(k) => debug!(
                activation = %k.to_spec(),
                entries = table.map.len(),
                "bindings_built"
            ),
            None if !raw.is_empty() => {
                warn!("No activation key found in bindings; implicit show is disabled")
            }
            None => debug!("bindings_empty"),
        }
        table
    }

    /// The designated activation key.
    pub fn activation_key(&self) -> Option<Key> {
        self.activation
    }

    /// Exact lookup.
    pub fn get(&self, key: &BindingKey) -> Option<&MenuId> {
        self.map.get(key)
    }

    /// Lookup with modifier fallback.
    ///
    /// Tries the exact combination first; if modifiers are held and nothing
    /// matches, retries with the modifiers cleared. Buttons are never dropped.
    pub fn lookup(&self, buttons: Buttons, modifiers: Modifiers, key: Option<Key>) -> Option<&MenuId> {
        self.lookup_keys(key.as_slice(), modifiers, buttons)
    }

    /// Like [`lookup`](Self::lookup) for combinations holding several keys.
    pub fn lookup_keys(&self, keys: &[Key], modifiers: Modifiers, buttons: Buttons) -> Option<&MenuId> {
        let exact = BindingKey::from_input(keys, modifiers, buttons);
        if let Some(m) = self.map.get(&exact) {
            trace!(key = %exact, menu = %m, "binding_hit");
            return Some(m);
        }
        if !modifiers.is_empty() {
            let bare = BindingKey::from_input(keys, Modifiers::empty(), buttons);
            if let Some(m) = self.map.get(&bare) {
                trace!(key = %exact, fallback = %bare, menu = %m, "binding_hit_fallback");
                return Some(m);
            }
        }
        trace!(key = %exact, "binding_miss");
        None
    }

    /// Menu bound to the activation key alone.
    pub fn default_menu(&self) -> Option<&MenuId> {
        let key = self.activation?;
        self.lookup(Buttons::empty(), Modifiers::empty(), Some(key))
    }

    /// Number of distinct bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Sorted snapshot of all bindings.
    pub fn entries(&self) -> Vec<(BindingKey, MenuId)> {
        let mut out: Vec<_> = self
            .map
            .iter()
            .map(|(k, m)| (k.clone(), m.clone()))
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> BindingTable {
        BindingTable::build(&entries.iter().copied().collect())
    }

    #[test]
    fn modifier_fallback() {
        let t = table(&[("F12", "start"), ("F12+Shift", "shifted")]);
        let f12 = Some(Key::F12);
        assert_eq!(
            t.lookup(Buttons::empty(), Modifiers::SHIFT, f12).map(MenuId::as_str),
            Some("shifted")
        );
        assert_eq!(
            t.lookup(Buttons::empty(), Modifiers::CONTROL, f12).map(MenuId::as_str),
            Some("start")
        );
    }

    #[test]
    fn buttons_are_never_stripped() {
        let t = table(&[("F12", "start")]);
        assert_eq!(
            t.lookup(Buttons::TERTIARY, Modifiers::SHIFT, Some(Key::F12)),
            None
        );
    }

    #[test]
    fn first_key_token_is_activation() {
        let t = table(&[
            ("SecondaryButton+Shift", "a"),
            ("Key_F12+RightButton", "radial_b"),
            ("F11", "other"),
            ("F12", "start"),
        ]);
        assert_eq!(t.activation_key(), Some(Key::F12));
        assert_eq!(t.default_menu().map(MenuId::as_str), Some("start"));
        assert_eq!(
            t.lookup(Buttons::SECONDARY, Modifiers::empty(), Some(Key::F12))
                .map(MenuId::as_str),
            Some("radial_b")
        );
    }

    #[test]
    fn no_activation_key_is_inert() {
        let t = table(&[("SecondaryButton", "a")]);
        assert_eq!(t.activation_key(), None);
        assert_eq!(t.default_menu(), None);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn permuted_specs_collide() {
        let t = table(&[("Shift+F12", "one"), ("F12|ShiftModifier", "two")]);
        assert_eq!(t.len(), 1);
        assert_eq!(
            t.get(&BindingTable::normalize(["shift", "f12"])).map(MenuId::as_str),
            Some("two")
        );
    }

    #[test]
    fn multiple_keys_combine() {
        let t = table(&[("F12", "start"), ("F12+Tab", "tabbed")]);
        assert_eq!(
            t.lookup_keys(&[Key::Tab, Key::F12], Modifiers::ALT, Buttons::empty())
                .map(MenuId::as_str),
            Some("tabbed")
        );
        assert_eq!(
            t.entries().iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["f12", "f12+tab"]
        );
    }
}
