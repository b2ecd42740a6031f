//! Gesture scripts.
//!
//! A script is a RON list of steps. Input steps take a chord spec in the
//! same syntax as bindings, e.g. `Press("F12+SecondaryButton")`.

use menu_keys::{BindingKey, Buttons, Key, Modifiers, Token};
use serde::Deserialize;

use crate::error::{Error, Result};

/// One scripted input or clock step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Step {
    /// Press a key with the modifiers and buttons named in the chord.
    Press(String),
    /// Release a key.
    Release(String),
    /// Press mouse buttons; the chord names everything held afterwards.
    MouseDown(String),
    /// Release mouse buttons; the chord names everything still held.
    MouseUp(String),
    /// Move the cursor onto a named widget and report hover-enter.
    Hover(String),
    /// Report hover-leave for a named widget.
    Leave(String),
    /// Move the cursor without hover notifications.
    Cursor(i32, i32),
    /// Advance virtual time by this many milliseconds.
    Wait(u64),
    /// Explicitly show a menu, or the activation key's menu.
    Show(Option<String>),
    /// Explicitly hide the overlay.
    Hide,
}

/// Parsed script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Script {
    /// Steps in replay order.
    pub steps: Vec<Step>,
}

/// Input state named by a chord spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chord {
    /// First key token, if any.
    pub key: Option<Key>,
    /// Modifier tokens.
    pub modifiers: Modifiers,
    /// Button tokens.
    pub buttons: Buttons,
}

impl Chord {
    /// Parse a chord spec. Unknown tokens are an error; an empty spec is an
    /// empty chord.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut chord = Self::default();
        for tok in BindingKey::split_spec(spec) {
            match Token::parse(tok) {
                Some(Token::Key(k)) => {
                    chord.key.get_or_insert(k);
                }
                Some(Token::Modifier(m)) => chord.modifiers |= m.flag(),
                Some(Token::Button(b)) => chord.buttons |= b.flag(),
                None => return Err(Error::script(format!("unknown token {tok:?} in {spec:?}"))),
            }
        }
        Ok(chord)
    }

    /// The chord's key, or an error naming the spec.
    pub fn require_key(&self, spec: &str) -> Result<Key> {
        self.key
            .ok_or_else(|| Error::script(format!("{spec:?} names no key")))
    }
}

/// Parse a RON script.
pub fn parse(text: &str) -> Result<Script> {
    ron::from_str(text).map_err(|e| Error::script(e.to_string()))
}
