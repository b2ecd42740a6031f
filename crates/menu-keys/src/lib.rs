//! menu-keys: the input vocabulary of the marking-menu controller.
//!
//! - `Key`: keyboard keys that can act as activation or binding keys.
//! - `Modifier` / `Modifiers`: keyboard modifiers and their held-set mask.
//! - `Button` / `Buttons`: mouse buttons and their held-set mask.
//! - `Token`: one component of a binding spec (key, modifier or button).
//! - `BindingKey`: the canonical, order-independent form of a combination.
//!
//! Specs are case-insensitive and accept common aliases, including the
//! toolkit-style names (`Key_F12`, `RightButton`, `ShiftModifier`) that older
//! binding tables were written with.

mod key;
pub use key::Key;

mod spec;

mod modifiers;
pub use modifiers::{Modifier, Modifiers};

mod button;
pub use button::{Button, Buttons};

mod token;
pub use token::Token;

mod binding_key;
pub use binding_key::BindingKey;
