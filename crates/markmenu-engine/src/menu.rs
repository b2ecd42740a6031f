//! Menu identifiers and the nodes a UI provider hands back.
//!
//! A menu identifier is a plain name optionally followed by `#tag` suffixes,
//! for example `edit#submenu`. Two tags are meaningful to the controller:
//! [`TAG_STARTMENU`] marks the root of a radial hierarchy and [`TAG_SUBMENU`]
//! marks a nested radial page. A menu carrying neither is a standalone window.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::host::WidgetId;

/// Tag marking the root of a radial hierarchy.
pub const TAG_STARTMENU: &str = "startmenu";
/// Tag marking a nested radial page.
pub const TAG_SUBMENU: &str = "submenu";
/// Tags that place a menu inside the overlay.
pub const RADIAL_TAGS: [&str; 2] = [TAG_STARTMENU, TAG_SUBMENU];

/// Something that carries menu tags.
pub trait Taggable {
    /// True if `tag` is present.
    fn has_tag(&self, tag: &str) -> bool;

    /// True if any of `tags` is present.
    fn has_tags(&self, tags: &[&str]) -> bool {
        tags.iter().any(|t| self.has_tag(t))
    }

    /// True for members of the radial hierarchy.
    fn is_radial(&self) -> bool {
        self.has_tags(&RADIAL_TAGS)
    }
}

/// A menu identifier: `name[#tag...]`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(String);

impl MenuId {
    /// Wrap an identifier string verbatim.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The full identifier, tags included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without any tags.
    pub fn base(&self) -> &str {
        self.0.split('#').next().unwrap_or_default()
    }

    /// Tags in the order they appear.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.split('#').skip(1).filter(|t| !t.is_empty())
    }

    /// This identifier with `tag` appended, unless already present.
    pub fn with_tag(&self, tag: &str) -> Self {
        if self.has_tag(tag) {
            self.clone()
        } else {
            Self(format!("{}#{}", self.0, tag))
        }
    }

    /// Drop every tag not in `known`.
    pub fn retain_tags(&self, known: &[&str]) -> Self {
        let mut out = self.base().to_string();
        for t in self.tags().filter(|t| known.contains(t)) {
            out.push('#');
            out.push_str(t);
        }
        Self(out)
    }
}

impl Taggable for MenuId {
    fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|t| t == tag)
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MenuId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MenuId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A loaded menu: the widget that renders it plus its identity and tags.
///
/// Owned by the UI provider; the controller only keeps copies of the handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuNode {
    /// Root widget of the menu.
    pub id: WidgetId,
    /// Identifier the menu was requested under.
    pub name: MenuId,
    /// Tags from the identifier merged with any the provider declared.
    pub tags: BTreeSet<String>,
}

impl MenuNode {
    /// Build a node whose tags come from its identifier.
    pub fn new(id: WidgetId, name: MenuId) -> Self {
        let tags = name.tags().map(str::to_string).collect();
        Self { id, name, tags }
    }

    /// Add a provider-declared tag.
    pub fn tagged(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }
}

impl Taggable for MenuNode {
    fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_from_identifier() {
        let m = MenuId::from("edit#submenu#pinned");
        assert_eq!(m.base(), "edit");
        assert_eq!(m.tags().collect::<Vec<_>>(), vec!["submenu", "pinned"]);
        assert!(m.has_tag(TAG_SUBMENU));
        assert!(m.is_radial());
        assert!(!MenuId::from("prefs").is_radial());
    }

    #[test]
    fn unknown_tags_are_stripped() {
        let m = MenuId::from("edit#pinned#submenu#floating");
        assert_eq!(m.retain_tags(&RADIAL_TAGS).as_str(), "edit#submenu");
        assert_eq!(MenuId::from("prefs#x").retain_tags(&RADIAL_TAGS).as_str(), "prefs");
    }

    #[test]
    fn with_tag_is_idempotent() {
        let m = MenuId::from("edit").with_tag(TAG_SUBMENU);
        assert_eq!(m.as_str(), "edit#submenu");
        assert_eq!(m.with_tag(TAG_SUBMENU), m);
    }

    #[test]
    fn node_merges_declared_tags() {
        let n = MenuNode::new(WidgetId(4), MenuId::from("start")).tagged(TAG_STARTMENU);
        assert!(n.has_tags(&[TAG_SUBMENU, TAG_STARTMENU]));
        assert!(n.is_radial());
    }
}
