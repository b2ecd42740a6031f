use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Keyboard modifiers that participate in bindings.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Modifier {
    /// Shift.
    Shift,
    /// Control.
    Control,
    /// Alt / Option.
    Alt,
    /// Meta / Command / Super.
    Meta,
}

impl Modifier {
    /// Every modifier, in canonical order.
    pub const ALL: [Self; 4] = [Self::Shift, Self::Control, Self::Alt, Self::Meta];

    /// Parses a modifier specification string.
    ///
    /// Case-insensitive; accepts the variant names, the toolkit-style
    /// `*Modifier` names, and the usual short forms (ctrl, opt, cmd, super).
    pub fn from_spec(s: &str) -> Option<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let base = lowered.strip_suffix("modifier").unwrap_or(&lowered);
        match base {
            "shift" => Some(Self::Shift),
            "control" | "ctrl" => Some(Self::Control),
            "alt" | "option" | "opt" => Some(Self::Alt),
            "meta" | "cmd" | "command" | "super" | "win" => Some(Self::Meta),
            _ => None,
        }
    }

    /// Returns the canonical spec string for this modifier, always lowercased.
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Control => "ctrl",
            Self::Alt => "alt",
            Self::Meta => "meta",
        }
    }

    /// The mask bit for this modifier.
    pub fn flag(self) -> Modifiers {
        match self {
            Self::Shift => Modifiers::SHIFT,
            Self::Control => Modifiers::CONTROL,
            Self::Alt => Modifiers::ALT,
            Self::Meta => Modifiers::META,
        }
    }
}

bitflags! {
    /// Set of currently held modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift held.
        const SHIFT = 1 << 0;
        /// Control held.
        const CONTROL = 1 << 1;
        /// Alt held.
        const ALT = 1 << 2;
        /// Meta held.
        const META = 1 << 3;
    }
}

impl Modifiers {
    /// Iterate the held modifiers in canonical order.
    pub fn modifiers(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL
            .into_iter()
            .filter(move |m| self.contains(m.flag()))
    }
}

impl From<Modifier> for Modifiers {
    fn from(m: Modifier) -> Self {
        m.flag()
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, m| acc | m.flag())
    }
}
