use std::result::Result as StdResult;

use thiserror::Error;

use crate::host::WidgetId;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the marking-menu engine.
///
/// None of these ever escape an input entry point on
/// [`ActivationController`](crate::ActivationController); they surface from
/// setup helpers such as scene loading and the driver.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] menu_config::Error),

    /// A host call failed.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// A scene description could not be parsed.
    #[error("Scene error: {0}")]
    Scene(String),

    /// The event channel has been closed by the receiver.
    #[error("Event channel closed")]
    ChannelClosed,
}

/// Failure reported by a host toolkit call.
///
/// The usual cause is a widget that was destroyed mid-gesture. The controller
/// logs these at `debug` and carries on as if the call were a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The widget no longer exists.
    #[error("widget {0} no longer exists")]
    Gone(WidgetId),

    /// The toolkit refused or failed the operation.
    #[error("{op} failed: {message}")]
    Failed {
        /// Name of the toolkit operation.
        op: &'static str,
        /// Toolkit-provided detail.
        message: String,
    },
}

impl HostError {
    /// Shorthand for a [`HostError::Failed`].
    pub fn failed(op: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            op,
            message: message.into(),
        }
    }
}
