//! Persistent list of strings.

use std::sync::Arc;

use rtypes_persistence::CollectionStore;

use crate::error::{CollectionError, Result};
use crate::iterator::SnapshotIterator;
use crate::persistent::PersistentState;
use crate::rtype::{digest, RType};
use crate::type_name::TypeName;

/// State of an [`RList`].
pub type ListState = Vec<String>;

/// Ordered list of strings, saved after every change.
///
/// Indices may be negative, counting back from the end (`-1` is the last
/// element).
pub struct RList {
    inner: PersistentState<ListState>,
}

impl RList {
    /// Loads the list `identifier` from `store`, creating an empty record if needed.
    pub fn open(
        identifier: impl Into<String>,
        store: Arc<dyn CollectionStore<ListState>>,
    ) -> Result<Self> {
        Ok(Self {
            inner: PersistentState::open(identifier.into(), store)?,
        })
    }

    /// Appends `item` to the end of the list.
    pub fn append(&mut self, item: impl Into<String>) -> Result<()> {
        let item = item.into();
        self.inner.update(|items| items.push(item))
    }

    /// Returns the element at `index`.
    pub fn get_item(&self, index: i64) -> Result<String> {
        let position = self.position(index)?;
        Ok(self.inner.state()[position].clone())
    }

    /// Removes and returns the element at `index`, or the last element when `None`.
    pub fn pop(&mut self, index: Option<i64>) -> Result<String> {
        let position = self.position(index.unwrap_or(-1))?;
        self.inner.update(|items| items.remove(position))
    }

    /// Read-only view of the elements.
    pub fn items(&self) -> &[String] {
        self.inner.state()
    }

    fn position(&self, index: i64) -> Result<usize> {
        let len = self.inner.state().len() as i64;
        let resolved = if index < 0 { len + index } else { index };
        if (0..len).contains(&resolved) {
            Ok(resolved as usize)
        } else {
            Err(CollectionError::IndexOutOfRange(index))
        }
    }
}

impl RType for RList {
    fn type_name(&self) -> TypeName {
        TypeName::RList
    }

    fn identifier(&self) -> &str {
        self.inner.identifier()
    }

    fn length(&self) -> usize {
        self.inner.state().len()
    }

    fn contains(&self, item: &str) -> bool {
        self.inner.state().iter().any(|i| i == item)
    }

    fn hash(&self) -> u64 {
        digest(self.inner.state())
    }

    /// Removes the first occurrence of `item`.
    fn remove(&mut self, item: &str) -> Result<()> {
        let position = self
            .inner
            .state()
            .iter()
            .position(|i| i == item)
            .ok_or_else(|| CollectionError::KeyNotFound(item.to_string()))?;
        self.inner.update(|items| {
            items.remove(position);
        })
    }

    fn iter(&self) -> SnapshotIterator {
        SnapshotIterator::new(self.inner.state().clone(), self.inner.counter().watch())
    }

    fn modification_count(&self) -> u64 {
        self.inner.counter().value()
    }
}
