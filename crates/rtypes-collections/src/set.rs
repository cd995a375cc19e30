//! Persistent set of strings.

use std::sync::Arc;

use indexmap::IndexSet;
use rtypes_persistence::CollectionStore;

use crate::error::{CollectionError, Result};
use crate::iterator::SnapshotIterator;
use crate::persistent::PersistentState;
use crate::rtype::{digest, RType};
use crate::type_name::TypeName;

/// State of an [`RSet`]: elements in insertion order.
pub type SetState = IndexSet<String>;

/// Set of unique strings, saved after every change.
///
/// Elements keep their insertion order, which fixes both the iteration order
/// and which element [`RSet::pop`] removes.
pub struct RSet {
    inner: PersistentState<SetState>,
}

impl RSet {
    /// Loads the set `identifier` from `store`, creating an empty record if needed.
    pub fn open(
        identifier: impl Into<String>,
        store: Arc<dyn CollectionStore<SetState>>,
    ) -> Result<Self> {
        Ok(Self {
            inner: PersistentState::open(identifier.into(), store)?,
        })
    }

    /// Adds `item`. Returns `false` (and changes nothing) if it was already present.
    pub fn add(&mut self, item: impl Into<String>) -> Result<bool> {
        let item = item.into();
        if self.inner.state().contains(&item) {
            return Ok(false);
        }
        self.inner.update(|elements| elements.insert(item))
    }

    /// Removes and returns the most recently inserted element.
    pub fn pop(&mut self) -> Result<String> {
        if self.inner.state().is_empty() {
            return Err(CollectionError::EmptyCollection);
        }
        self.inner
            .update(|elements| elements.pop())?
            .ok_or(CollectionError::EmptyCollection)
    }

    /// Read-only view of the elements.
    pub fn elements(&self) -> &SetState {
        self.inner.state()
    }
}

impl RType for RSet {
    fn type_name(&self) -> TypeName {
        TypeName::RSet
    }

    fn identifier(&self) -> &str {
        self.inner.identifier()
    }

    fn length(&self) -> usize {
        self.inner.state().len()
    }

    fn contains(&self, item: &str) -> bool {
        self.inner.state().contains(item)
    }

    fn hash(&self) -> u64 {
        let mut elements: Vec<&String> = self.inner.state().iter().collect();
        elements.sort();
        digest(&elements)
    }

    fn remove(&mut self, item: &str) -> Result<()> {
        if !self.inner.state().contains(item) {
            return Err(CollectionError::KeyNotFound(item.to_string()));
        }
        self.inner.update(|elements| {
            elements.shift_remove(item);
        })
    }

    fn iter(&self) -> SnapshotIterator {
        let items = self.inner.state().iter().cloned().collect();
        SnapshotIterator::new(items, self.inner.counter().watch())
    }

    fn modification_count(&self) -> u64 {
        self.inner.counter().value()
    }
}
