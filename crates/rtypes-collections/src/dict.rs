//! Persistent string-to-string dictionary.

use std::sync::Arc;

use indexmap::IndexMap;
use rtypes_persistence::CollectionStore;

use crate::error::{CollectionError, Result};
use crate::iterator::SnapshotIterator;
use crate::persistent::PersistentState;
use crate::rtype::{digest, RType};
use crate::type_name::TypeName;

/// State of an [`RDict`]: entries in insertion order.
pub type DictState = IndexMap<String, String>;

/// Dictionary of strings, saved after every change.
///
/// Iteration yields `"key: value"` strings in insertion order.
pub struct RDict {
    inner: PersistentState<DictState>,
}

impl RDict {
    /// Loads the dictionary `identifier` from `store`, creating an empty record if needed.
    pub fn open(
        identifier: impl Into<String>,
        store: Arc<dyn CollectionStore<DictState>>,
    ) -> Result<Self> {
        Ok(Self {
            inner: PersistentState::open(identifier.into(), store)?,
        })
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// Writing the value a key already has changes nothing and is not counted.
    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        if self.inner.state().get(&key) == Some(&value) {
            return Ok(());
        }
        self.inner.update(|entries| {
            entries.insert(key, value);
        })
    }

    /// Returns the value stored under `key`.
    pub fn get_item(&self, key: &str) -> Result<String> {
        self.inner
            .state()
            .get(key)
            .cloned()
            .ok_or_else(|| CollectionError::KeyNotFound(key.to_string()))
    }

    /// Removes `key` and returns its value.
    pub fn pop(&mut self, key: &str) -> Result<String> {
        let value = self.get_item(key)?;
        self.inner.update(|entries| {
            entries.shift_remove(key);
        })?;
        Ok(value)
    }

    /// Read-only view of the entries.
    pub fn entries(&self) -> &DictState {
        self.inner.state()
    }
}

impl RType for RDict {
    fn type_name(&self) -> TypeName {
        TypeName::RDict
    }

    fn identifier(&self) -> &str {
        self.inner.identifier()
    }

    fn length(&self) -> usize {
        self.inner.state().len()
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.state().contains_key(key)
    }

    fn hash(&self) -> u64 {
        let mut entries: Vec<(&String, &String)> = self.inner.state().iter().collect();
        entries.sort();
        digest(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.pop(key).map(|_| ())
    }

    fn iter(&self) -> SnapshotIterator {
        let items = self
            .inner
            .state()
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        SnapshotIterator::new(items, self.inner.counter().watch())
    }

    fn modification_count(&self) -> u64 {
        self.inner.counter().value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::IterStep;
    use rtypes_persistence::{JsonFileStore, MemoryStore};
    use tempfile::tempdir;

    fn memory_dict(id: &str) -> (RDict, Arc<MemoryStore<DictState>>) {
        let store = Arc::new(MemoryStore::new());
        let dict = RDict::open(id, store.clone()).unwrap();
        (dict, store)
    }

    #[test]
    fn test_set_and_get_item() {
        let (mut dict, _) = memory_dict("D1");
        dict.set_item("k", "v").unwrap();

        assert_eq!(dict.get_item("k").unwrap(), "v");
        assert_eq!(dict.length(), 1);
        assert!(dict.contains("k"));
        assert!(!dict.contains("v"));
    }

    #[test]
    fn test_get_missing_key() {
        let (dict, _) = memory_dict("D1");
        assert!(matches!(
            dict.get_item("missing"),
            Err(CollectionError::KeyNotFound(key)) if key == "missing"
        ));
    }

    #[test]
    fn test_set_item_upserts() {
        let (mut dict, _) = memory_dict("D1");
        dict.set_item("k", "v1").unwrap();
        dict.set_item("k", "v2").unwrap();

        assert_eq!(dict.length(), 1);
        assert_eq!(dict.get_item("k").unwrap(), "v2");
        assert_eq!(dict.modification_count(), 2);
    }

    #[test]
    fn test_set_same_pair_is_idempotent() {
        let (mut dict, store) = memory_dict("D1");
        dict.set_item("k", "v").unwrap();
        let saves = store.save_count();

        dict.set_item("k", "v").unwrap();

        assert_eq!(dict.length(), 1);
        assert_eq!(dict.modification_count(), 1);
        assert_eq!(store.save_count(), saves);
    }

    #[test]
    fn test_pop_returns_value() {
        let (mut dict, _) = memory_dict("D1");
        dict.set_item("k", "v").unwrap();

        assert_eq!(dict.pop("k").unwrap(), "v");
        assert_eq!(dict.length(), 0);
        assert!(matches!(dict.pop("k"), Err(CollectionError::KeyNotFound(_))));
    }

    #[test]
    fn test_remove_missing_does_not_count() {
        let (mut dict, _) = memory_dict("D1");

        assert!(matches!(dict.remove("k"), Err(CollectionError::KeyNotFound(_))));
        assert_eq!(dict.modification_count(), 0);
    }

    #[test]
    fn test_every_change_is_saved() {
        let (mut dict, store) = memory_dict("D1");
        dict.set_item("a", "1").unwrap();
        dict.set_item("b", "2").unwrap();
        dict.remove("a").unwrap();

        let saved = store.record("D1").unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_hash_ignores_insertion_order() {
        let (mut d1, _) = memory_dict("D1");
        let (mut d2, _) = memory_dict("D2");
        d1.set_item("a", "1").unwrap();
        d1.set_item("b", "2").unwrap();
        d2.set_item("b", "2").unwrap();
        d2.set_item("a", "1").unwrap();

        assert_eq!(d1.hash(), d2.hash());

        d2.set_item("a", "changed").unwrap();
        assert_ne!(d1.hash(), d2.hash());
    }

    #[test]
    fn test_iter_formats_entries() {
        let (mut dict, _) = memory_dict("D1");
        dict.set_item("key1", "value1").unwrap();
        dict.set_item("key2", "value2").unwrap();

        let mut iter = dict.iter();
        assert_eq!(iter.next_step(), IterStep::Item("key1: value1".to_string()));
        assert_eq!(iter.next_step(), IterStep::Item("key2: value2".to_string()));
        assert_eq!(iter.next_step(), IterStep::Exhausted);
    }

    #[test]
    fn test_iter_cancelled_by_set_item() {
        let (mut dict, _) = memory_dict("D1");
        dict.set_item("key1", "value1").unwrap();

        let mut iter = dict.iter();
        dict.set_item("key2", "value2").unwrap();

        assert_eq!(iter.next_step(), IterStep::Cancelled);
    }

    #[test]
    fn test_failed_save_keeps_previous_state() {
        let (mut dict, store) = memory_dict("D1");
        dict.set_item("k", "v").unwrap();
        store.fail_writes(true);

        assert!(matches!(
            dict.set_item("k", "other"),
            Err(CollectionError::Persistence(_))
        ));
        assert!(matches!(dict.pop("k"), Err(CollectionError::Persistence(_))));
        assert_eq!(dict.get_item("k").unwrap(), "v");
        assert_eq!(dict.modification_count(), 1);
    }

    #[test]
    fn test_reload_from_file() {
        let dir = tempdir().unwrap();
        let store: Arc<JsonFileStore<DictState>> =
            Arc::new(JsonFileStore::per_identifier(dir.path(), "rdict"));

        {
            let mut dict = RDict::open("D1", store.clone()).unwrap();
            dict.set_item("a", "1").unwrap();
            dict.set_item("b", "2").unwrap();
        }

        let reloaded = RDict::open("D1", store).unwrap();
        assert_eq!(reloaded.length(), 2);
        assert_eq!(reloaded.get_item("b").unwrap(), "2");
        assert_eq!(reloaded.modification_count(), 0);
    }
}
