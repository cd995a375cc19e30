//! Capability interface shared by every collection type.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use crate::iterator::SnapshotIterator;
use crate::type_name::TypeName;

/// Operations every remote collection supports.
///
/// Type-specific operations (`set_item`, `append`, `add`, ...) live on the
/// concrete types and are reached by matching on [`Handle`](crate::Handle).
pub trait RType {
    /// Kind of this collection.
    fn type_name(&self) -> TypeName;

    /// Identifier of this instance.
    fn identifier(&self) -> &str;

    /// Number of entries.
    fn length(&self) -> usize;

    /// Exact-match membership (keys for a dict, elements otherwise).
    fn contains(&self, item: &str) -> bool;

    /// Digest of the contents in canonical order.
    ///
    /// Equal contents give equal digests. Dict and set contents are sorted
    /// first; list contents keep their order.
    fn hash(&self) -> u64;

    /// Removes a key or element, failing with `KeyNotFound` if absent.
    fn remove(&mut self, item: &str) -> Result<()>;

    /// Creates a fail-fast iterator over the current contents.
    fn iter(&self) -> SnapshotIterator;

    /// Number of committed changes since the instance was created.
    fn modification_count(&self) -> u64;
}

/// Hashes `value` with the standard SipHash hasher.
pub(crate) fn digest<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
