use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Buttons, Key, Modifiers, Token};

/// Canonical, order-independent identifier for a combination of activation
/// key, modifiers and buttons.
///
/// Each recognized token is rewritten to its canonical spec; unrecognized
/// tokens are kept verbatim (trimmed), which guarantees they never collide
/// with a physical combination. Tokens are deduplicated, sorted lexically
/// and joined with `+`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BindingKey(String);

impl BindingKey {
    /// Separators accepted between tokens of a binding spec.
    pub const SEPARATORS: [char; 2] = ['+', '|'];

    /// Normalizes an arbitrary collection of token strings.
    pub fn normalize<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts: Vec<String> = tokens
            .into_iter()
            .filter_map(|t| {
                let t = t.as_ref().trim();
                if t.is_empty() {
                    return None;
                }
                Some(Token::parse(t).map_or_else(|| t.to_string(), Token::to_spec))
            })
            .collect();
        parts.sort();
        parts.dedup();
        Self(parts.join("+"))
    }

    /// Splits a binding spec such as `"F12+SecondaryButton"` into its raw tokens.
    pub fn split_spec(spec: &str) -> impl Iterator<Item = &str> {
        spec.split(Self::SEPARATORS)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Parses and normalizes a binding spec string.
    pub fn parse(spec: &str) -> Self {
        Self::normalize(Self::split_spec(spec))
    }

    /// Builds the key for a physical input state holding `keys`.
    pub fn from_input(keys: &[Key], modifiers: Modifiers, buttons: Buttons) -> Self {
        let tokens = keys
            .iter()
            .copied()
            .map(Token::Key)
            .chain(modifiers.modifiers().map(Token::Modifier))
            .chain(buttons.buttons().map(Token::Button))
            .map(Token::to_spec);
        Self::normalize(tokens)
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the key contains no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
