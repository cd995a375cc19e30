//! Error types for collection operations.

use rtypes_persistence::PersistenceError;
use thiserror::Error;

use crate::type_name::TypeName;

/// Errors returned by collection operations.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// Key (dict) or element (list, set) is not present.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// List index outside the valid range.
    #[error("index out of range: {0}")]
    IndexOutOfRange(i64),

    /// Operation needs at least one element.
    #[error("collection is empty")]
    EmptyCollection,

    /// The new state could not be saved; nothing was changed.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type alias for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Errors returned by [`ObjectFactory`](crate::ObjectFactory).
#[derive(Error, Debug)]
pub enum FactoryError {
    /// Type name outside {RDict, RList, RSet}.
    #[error("invalid type requested: {0}")]
    InvalidType(String),

    /// Identifier cannot be used as a storage key.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Loading or initialising the collection failed.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// A handle was resolved as a type it is not.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot cast {actual} handle to {expected}")]
pub struct CastError {
    /// The type the caller asked for.
    pub expected: TypeName,
    /// The type the handle actually refers to.
    pub actual: TypeName,
}

/// The collection changed after the iterator was created.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("collection modified during iteration")]
pub struct IterationCancelled;
