use serde::{Deserialize, Serialize};

/// Declares the `Key` enum together with its name table.
macro_rules! declare_keys {
    ( $( $k:ident ),* $(,)? ) => {
        /// Keyboard keys that may appear in a binding.
        ///
        /// Modifier keys are deliberately absent: they are represented by
        /// [`crate::Modifier`] so that a binding can never designate a
        /// modifier as its activation key.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        #[allow(missing_docs)]
        pub enum Key {
            $( $k, )*
        }

        impl Key {
            /// Every key, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$k, )* ];

            /// The enum variant name.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$k => stringify!($k), )*
                }
            }

            /// Case-insensitive lookup by enum variant name.
            pub fn from_name(s: &str) -> Option<Self> {
                $(
                    if s.eq_ignore_ascii_case(stringify!($k)) {
                        return Some(Self::$k);
                    }
                )*
                None
            }
        }
    };
}

declare_keys! {
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    F13, F14, F15, F16, F17, F18, F19, F20, F21, F22, F23, F24,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    Escape, Tab, Space, Return, Backspace, Insert, Delete,
    Home, End, PageUp, PageDown,
    LeftArrow, RightArrow, UpArrow, DownArrow,
    Minus, Equal, LeftBracket, RightBracket, Backslash,
    Semicolon, Quote, Comma, Period, Slash, Grave,
    CapsLock, Menu, Pause, Print, ScrollLock,
}
