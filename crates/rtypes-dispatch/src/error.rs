//! Error taxonomy at the operation boundary.

use rtypes_collections::{CastError, CollectionError, FactoryError};
use thiserror::Error;

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Failure of a single operation.
///
/// Each variant has a stable [`code`](DispatchError::code). Validation
/// failures display as the bare code; the detail is kept for logging.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Required descriptor field or argument missing or of the wrong shape.
    #[error("MalformedOperation")]
    MalformedOperation(String),

    /// `object_type` outside {RDict, RList, RSet}.
    #[error("UnknownObjectType")]
    UnknownObjectType(String),

    /// Operation that exists but cannot run over this protocol (`iter`).
    #[error("OperationNotSupported")]
    OperationNotSupported(String),

    #[error("KeyNotFound: {0}")]
    KeyNotFound(String),

    #[error("IndexOutOfRange: {0}")]
    IndexOutOfRange(i64),

    #[error("EmptyCollection")]
    EmptyCollection,

    /// The new state could not be saved; the collection is unchanged.
    #[error("PersistenceFailure: {0}")]
    PersistenceFailure(String),

    #[error("Internal: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::MalformedOperation(_) => "MalformedOperation",
            DispatchError::UnknownObjectType(_) => "UnknownObjectType",
            DispatchError::OperationNotSupported(_) => "OperationNotSupported",
            DispatchError::KeyNotFound(_) => "KeyNotFound",
            DispatchError::IndexOutOfRange(_) => "IndexOutOfRange",
            DispatchError::EmptyCollection => "EmptyCollection",
            DispatchError::PersistenceFailure(_) => "PersistenceFailure",
            DispatchError::Internal(_) => "Internal",
        }
    }

    /// Detail behind a validation failure, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            DispatchError::MalformedOperation(detail)
            | DispatchError::UnknownObjectType(detail)
            | DispatchError::OperationNotSupported(detail) => Some(detail),
            _ => None,
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        DispatchError::MalformedOperation(detail.into())
    }
}

impl From<CollectionError> for DispatchError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::KeyNotFound(key) => DispatchError::KeyNotFound(key),
            CollectionError::IndexOutOfRange(index) => DispatchError::IndexOutOfRange(index),
            CollectionError::EmptyCollection => DispatchError::EmptyCollection,
            CollectionError::Persistence(e) => DispatchError::PersistenceFailure(e.to_string()),
            CollectionError::LockPoisoned(msg) => DispatchError::Internal(msg),
        }
    }
}

impl From<FactoryError> for DispatchError {
    fn from(err: FactoryError) -> Self {
        match err {
            FactoryError::InvalidType(name) => DispatchError::UnknownObjectType(name),
            FactoryError::InvalidIdentifier(id) => {
                DispatchError::malformed(format!("invalid identifier {:?}", id))
            }
            FactoryError::Collection(e) => e.into(),
            FactoryError::LockPoisoned(msg) => DispatchError::Internal(msg),
        }
    }
}

impl From<CastError> for DispatchError {
    fn from(err: CastError) -> Self {
        DispatchError::Internal(err.to_string())
    }
}

/// A whole inbound payload could not be decoded; the batch is dropped.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload is not a JSON array (got {0})")]
    NotAnArray(&'static str),
}
