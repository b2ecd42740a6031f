//! Error handling for the markmenu-sim crate.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for simulator operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running the simulator.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Configuration parsing errors.
    #[error("Configuration error: {0}")]
    Config(#[from] menu_config::Error),
    /// Scene or controller errors.
    #[error("Engine error: {0}")]
    Engine(#[from] markmenu_engine::Error),
    /// The gesture script could not be parsed or names something unknown.
    #[error("Script error: {0}")]
    Script(String),
}

impl Error {
    /// Helper to build a script error from an arbitrary message.
    pub fn script<M: Into<String>>(msg: M) -> Self {
        Self::Script(msg.into())
    }
}
