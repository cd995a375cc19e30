//! In-memory store for tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{PersistenceError, Result};
use crate::store::CollectionStore;

/// Keeps records in a process-local map.
///
/// Writes can be switched off with [`MemoryStore::fail_writes`] to exercise
/// the persistence-failure path of callers.
pub struct MemoryStore<S> {
    records: Mutex<HashMap<String, S>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl<S: Clone> MemoryStore<S> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// Creates a store pre-populated with one record.
    pub fn with_record(identifier: impl Into<String>, state: S) -> Self {
        let store = Self::new();
        if let Ok(mut records) = store.records.lock() {
            records.insert(identifier.into(), state);
        }
        store
    }

    /// Makes every subsequent save fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Returns a copy of the record currently held for `identifier`.
    pub fn record(&self, identifier: &str) -> Option<S> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(identifier).cloned())
    }
}

impl<S: Clone> Default for MemoryStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CollectionStore<S> for MemoryStore<S>
where
    S: Clone + Send,
{
    fn load(&self, identifier: &str) -> Result<Option<S>> {
        let records = self
            .records
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        Ok(records.get(identifier).cloned())
    }

    fn save(&self, identifier: &str, state: &S) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(format!(
                "writes disabled for {}",
                identifier
            )));
        }

        let mut records = self
            .records
            .lock()
            .map_err(|e| PersistenceError::LockPoisoned(e.to_string()))?;
        records.insert(identifier.to_string(), state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
