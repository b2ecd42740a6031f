use crate::Key;

// Central mapping between enum variants and spec strings for shorthand/non-name specs.
// Extend this list to cover more punctuation or shorthand.
macro_rules! key_spec_map {
    ($m:ident, $arg:tt) => {
        $m! { $arg,
            Digit0 => "0",
            Digit1 => "1",
            Digit2 => "2",
            Digit3 => "3",
            Digit4 => "4",
            Digit5 => "5",
            Digit6 => "6",
            Digit7 => "7",
            Digit8 => "8",
            Digit9 => "9",
            Minus => "-",
            Equal => "=",
            LeftBracket => "[",
            RightBracket => "]",
            Backslash => "\\",
            Semicolon => ";",
            Quote => "'",
            Comma => ",",
            Period => ".",
            Slash => "/",
            Grave => "`",
        }
    };
}

macro_rules! to_spec_match {
    ( $key:expr, $( $k:ident => $s:expr, )* ) => {
        match $key {
            $( Key::$k => $s, )*
            _ => $key.name(),
        }
    }
}

macro_rules! from_spec_match {
    ( $s:expr, $( $k:ident => $v:expr, )* ) => {{
        match $s {
            $( $v => Some(Key::$k), )*
            _ => None,
        }
    }}
}

// Aliases that only apply to parsing specs (not emitted by to_spec).
macro_rules! key_spec_aliases {
    ($m:ident, $arg:expr) => {
        $m! { $arg,
            Return => "enter",
            Return => "ret",
            Delete => "del",
            Backspace => "bksp",
            Escape => "esc",
            Insert => "ins",
            LeftArrow => "left",
            RightArrow => "right",
            UpArrow => "up",
            DownArrow => "down",
            PageUp => "pgup",
            PageDown => "pgdn",
            CapsLock => "caps",
            Print => "printscreen",
            Grave => "backquote",
            Quote => "apostrophe",
        }
    };
}

/// Strips a toolkit-style `Key_` prefix, case-insensitively.
fn strip_key_prefix(s: &str) -> &str {
    match s.get(..4) {
        Some(p) if p.eq_ignore_ascii_case("key_") => &s[4..],
        _ => s,
    }
}

/// Parses a key specification into a `Key`.
///
/// Tries, in order: a case-insensitive enum name, the shorthand symbols in
/// `key_spec_map`, then the alias words. A leading `Key_` is ignored so that
/// `Key_F12`, `F12` and `f12` all name the same key.
pub fn from_spec(s: &str) -> Option<Key> {
    let s = strip_key_prefix(s);
    if let Some(k) = Key::from_name(s) {
        return Some(k);
    }
    if let some @ Some(_) = key_spec_map!(from_spec_match, s) {
        return some;
    }
    let lowered = s.to_ascii_lowercase();
    key_spec_aliases!(from_spec_match, lowered.as_str())
}

/// Returns the canonical key specification string for a `Key`.
pub fn to_spec(key: Key) -> String {
    let s = key_spec_map!(to_spec_match, key);
    s.to_ascii_lowercase()
}

impl Key {
    /// Parses a key specification string into a `Key`.
    ///
    /// Accepts enum variant names (case-insensitive, optionally prefixed with
    /// `Key_`), symbol shorthands for digits and punctuation, and alias words
    /// such as esc, enter, del, left, pgup.
    pub fn from_spec(s: &str) -> Option<Self> {
        from_spec(s)
    }

    /// Returns the canonical spec string: the symbol form for digits and
    /// punctuation, otherwise the lowercased variant name.
    pub fn to_spec(self) -> String {
        to_spec(self)
    }
}
