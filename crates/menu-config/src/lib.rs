//! Configuration types for the marking-menu controller: the bindings table,
//! timing and overlay tuning, file loading, and the observable bindings store.

mod bindings;
mod error;
mod loader;
mod store;
mod tuning;

pub use bindings::Bindings;
pub use error::Error;
pub use loader::{Config, load_from_path, parse_json, parse_ron};
pub use store::BindingsStore;
pub use tuning::{OverlayOpts, Timing};
