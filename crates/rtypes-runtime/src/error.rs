//! Error types for the runtime crate.

use rtypes_dispatch::TransportError;
use thiserror::Error;

/// Errors that can occur in the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Runtime not started.
    #[error("runtime not started")]
    NotStarted,

    /// Runtime already started.
    #[error("runtime already started")]
    AlreadyStarted,

    /// Shutdown error.
    #[error("shutdown error: {0}")]
    Shutdown(String),

    /// Reading from or writing to a channel failed.
    #[error("channel error: {0}")]
    Channel(String),

    /// A response batch could not be encoded.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Channel(err.to_string())
    }
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
