use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Mouse buttons that participate in bindings.
///
/// Named by role rather than position: the secondary button is the one a
/// right-handed mouse reports as "right".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Button {
    /// Primary action button (usually left).
    Primary,
    /// Secondary action button (usually right).
    Secondary,
    /// Tertiary action button (usually middle / wheel).
    Tertiary,
}

impl Button {
    /// Every button, in canonical order.
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary, Self::Tertiary];

    /// Buttons ordered by capture priority: the buttons hosts use for camera
    /// and tool gestures come first.
    pub const PRIORITY: [Self; 3] = [Self::Secondary, Self::Tertiary, Self::Primary];

    /// Parses a button specification string (case-insensitive).
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primarybutton" | "primary" | "leftbutton" | "lmb" | "button1" => Some(Self::Primary),
            "secondarybutton" | "secondary" | "rightbutton" | "rmb" | "button2" => {
                Some(Self::Secondary)
            }
            "tertiarybutton" | "tertiary" | "middlebutton" | "mmb" | "button3" => {
                Some(Self::Tertiary)
            }
            _ => None,
        }
    }

    /// Returns the canonical spec string for this button.
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Primary => "primarybutton",
            Self::Secondary => "secondarybutton",
            Self::Tertiary => "tertiarybutton",
        }
    }

    /// The mask bit for this button.
    pub fn flag(self) -> Buttons {
        match self {
            Self::Primary => Buttons::PRIMARY,
            Self::Secondary => Buttons::SECONDARY,
            Self::Tertiary => Buttons::TERTIARY,
        }
    }
}

bitflags! {
    /// Set of currently held mouse buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        /// Primary held.
        const PRIMARY = 1 << 0;
        /// Secondary held.
        const SECONDARY = 1 << 1;
        /// Tertiary held.
        const TERTIARY = 1 << 2;
    }
}

impl Buttons {
    /// Iterate the held buttons in canonical order.
    pub fn buttons(self) -> impl Iterator<Item = Button> {
        Button::ALL
            .into_iter()
            .filter(move |b| self.contains(b.flag()))
    }

    /// Number of buttons held.
    pub fn count(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// The highest-priority held button, if any (see [`Button::PRIORITY`]).
    pub fn priority(self) -> Option<Button> {
        Button::PRIORITY
            .into_iter()
            .find(|b| self.contains(b.flag()))
    }
}

impl From<Button> for Buttons {
    fn from(b: Button) -> Self {
        b.flag()
    }
}

impl FromIterator<Button> for Buttons {
    fn from_iter<T: IntoIterator<Item = Button>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, b| acc | b.flag())
    }
}
