use std::path::PathBuf;

use crate::pin::PinState;

/// Errors that can occur in GPIO operations.
#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    /// The operation is not legal in the current pin state.
    #[error("{operation} not permitted while pin is {state}")]
    InvalidState {
        operation: &'static str,
        state: PinState,
    },

    /// A direction, edge mode or pin number outside the accepted set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A sysfs control file could not be opened or written.
    #[error("gpio resource unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A single-byte transfer on the open value file did not complete.
    #[error("short {operation} on {path}")]
    ShortTransfer {
        operation: &'static str,
        path: PathBuf,
    },

    /// An I/O error on the open value file.
    #[error("gpio value I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GpioError {
    /// Whether the error leaves the device in an unknown state.
    ///
    /// Fatal errors come from the already-open value file; everything else
    /// is reported to the parent and the port keeps serving.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ShortTransfer { .. } | Self::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, GpioError>;
