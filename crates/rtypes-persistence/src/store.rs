//! The persistence port shared by every collection type.

use crate::error::Result;

/// Loads and saves the state of collections identified by string.
///
/// `S` is the collection's in-memory state (a map, a vector, a set). Stores
/// must be safe to share between threads because the same store backs every
/// instance of a collection type.
pub trait CollectionStore<S>: Send + Sync {
    /// Loads the persisted state for `identifier`.
    ///
    /// Returns `Ok(None)` when no usable record exists, including when the
    /// backing file is missing or malformed.
    fn load(&self, identifier: &str) -> Result<Option<S>>;

    /// Persists `state` as the complete record for `identifier`.
    ///
    /// Returns only after the write has completed.
    fn save(&self, identifier: &str, state: &S) -> Result<()>;
}
