use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// The raw bindings table: `"<token>[+<token>...]" -> "<menu-identifier>"`.
///
/// Entries keep their configuration order. Order is irrelevant for lookup
/// but decides which key token becomes the activation key, so a plain hash
/// map would make that choice nondeterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<(String, String)>,
}

impl Bindings {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, spec: impl Into<String>, menu: impl Into<String>) {
        let spec = spec.into();
        let menu = menu.into();
        match self.entries.iter_mut().find(|(s, _)| *s == spec) {
            Some(slot) => slot.1 = menu,
            None => self.entries.push((spec, menu)),
        }
    }

    /// Remove an entry by its exact spec string.
    pub fn remove(&mut self, spec: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(s, _)| s == spec)?;
        Some(self.entries.remove(idx).1)
    }

    /// Menu identifier bound to an exact spec string.
    pub fn get(&self, spec: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == spec)
            .map(|(_, m)| m.as_str())
    }

    /// Iterate entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, m)| (s.as_str(), m.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, M: Into<String>> FromIterator<(S, M)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (S, M)>>(iter: T) -> Self {
        let mut b = Self::new();
        for (s, m) in iter {
            b.insert(s, m);
        }
        b
    }
}

impl Serialize for Bindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (s, m) in &self.entries {
            map.serialize_entry(s, m)?;
        }
        map.end()
    }
}

/// Order-preserving map visitor.
struct BindingsVisitor;

impl<'de> Visitor<'de> for BindingsVisitor {
    type Value = Bindings;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of binding specs to menu identifiers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = Bindings::new();
        while let Some((spec, menu)) = access.next_entry::<String, String>()? {
            out.insert(spec, menu);
        }
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for Bindings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BindingsVisitor)
    }
}
