//! State, counter and store shared by every collection type.

use std::sync::Arc;

use rtypes_persistence::CollectionStore;
use tracing::debug;

use crate::counter::ModificationCounter;
use crate::error::Result;

/// Persisted state of one collection instance.
///
/// All changes go through [`PersistentState::commit`]: the candidate state is
/// saved first and only then becomes the live state, together with a single
/// counter bump. A failed save leaves both untouched.
pub(crate) struct PersistentState<S> {
    identifier: String,
    state: S,
    counter: ModificationCounter,
    store: Arc<dyn CollectionStore<S>>,
}

impl<S: Clone + Default> PersistentState<S> {
    /// Loads the record for `identifier`, or initialises and saves an empty one.
    pub(crate) fn open(identifier: String, store: Arc<dyn CollectionStore<S>>) -> Result<Self> {
        let state = match store.load(&identifier)? {
            Some(state) => state,
            None => {
                debug!(identifier = %identifier, "no record found, initialising empty state");
                let state = S::default();
                store.save(&identifier, &state)?;
                state
            }
        };

        Ok(Self {
            identifier,
            state,
            counter: ModificationCounter::new(),
            store,
        })
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn counter(&self) -> &ModificationCounter {
        &self.counter
    }

    /// Applies `change` to a copy of the state, persists it, then swaps it in.
    pub(crate) fn update<R>(&mut self, change: impl FnOnce(&mut S) -> R) -> Result<R> {
        let mut next = self.state.clone();
        let out = change(&mut next);
        self.commit(next)?;
        Ok(out)
    }

    fn commit(&mut self, next: S) -> Result<()> {
        self.store.save(&self.identifier, &next)?;
        self.state = next;
        self.counter.bump();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtypes_persistence::MemoryStore;

    #[test]
    fn test_open_initialises_and_saves_empty_record() {
        let store = Arc::new(MemoryStore::<Vec<String>>::new());
        let state = PersistentState::<Vec<String>>::open("L1".to_string(), store.clone()).unwrap();

        assert!(state.state().is_empty());
        assert_eq!(store.record("L1"), Some(Vec::new()));
        assert_eq!(state.counter().value(), 0);
    }

    #[test]
    fn test_open_loads_existing_record_without_saving() {
        let store = Arc::new(MemoryStore::with_record("L1", vec!["a".to_string()]));
        let state = PersistentState::<Vec<String>>::open("L1".to_string(), store.clone()).unwrap();

        assert_eq!(state.state(), &vec!["a".to_string()]);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_update_saves_and_bumps() {
        let store = Arc::new(MemoryStore::<Vec<String>>::new());
        let mut state = PersistentState::<Vec<String>>::open("L1".to_string(), store.clone()).unwrap();

        state.update(|items| items.push("x".to_string())).unwrap();

        assert_eq!(state.counter().value(), 1);
        assert_eq!(store.record("L1"), Some(vec!["x".to_string()]));
    }

    #[test]
    fn test_failed_save_leaves_state_and_counter() {
        let store = Arc::new(MemoryStore::<Vec<String>>::new());
        let mut state = PersistentState::<Vec<String>>::open("L1".to_string(), store.clone()).unwrap();
        store.fail_writes(true);

        let result = state.update(|items| items.push("x".to_string()));

        assert!(result.is_err());
        assert!(state.state().is_empty());
        assert_eq!(state.counter().value(), 0);
        assert_eq!(state.identifier(), "L1");
    }
}
