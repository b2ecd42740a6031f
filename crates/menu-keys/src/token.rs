use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Button, Key, Modifier};

/// One recognized component of a binding specification.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// A keyboard key; the first one seen in a table becomes the activation key.
    Key(Key),
    /// A keyboard modifier.
    Modifier(Modifier),
    /// A mouse button.
    Button(Button),
}

impl Token {
    /// Parses a single token.
    ///
    /// Buttons and modifiers are tried before keys so that a word like
    /// `left` keeps its key meaning only when no button alias claims it.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Some(b) = Button::from_spec(s) {
            return Some(Self::Button(b));
        }
        if let Some(m) = Modifier::from_spec(s) {
            return Some(Self::Modifier(m));
        }
        Key::from_spec(s).map(Self::Key)
    }

    /// Canonical spec string for this token.
    pub fn to_spec(self) -> String {
        match self {
            Self::Key(k) => k.to_spec(),
            Self::Modifier(m) => m.to_spec().to_string(),
            Self::Button(b) => b.to_spec().to_string(),
        }
    }

    /// The key, if this token is one.
    pub fn as_key(self) -> Option<Key> {
        match self {
            Self::Key(k) => Some(k),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_spec())
    }
}
