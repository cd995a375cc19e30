//! Monotonic modification counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counts state-changing mutations of one collection.
///
/// Starts at zero and is bumped exactly once per committed change. Iterators
/// keep a [`CounterWatch`] on it to detect changes without holding any lock
/// on the collection itself.
#[derive(Debug, Default)]
pub struct ModificationCounter(Arc<AtomicU64>);

impl ModificationCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count.
    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Records one committed change and returns the new count.
    pub(crate) fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Returns a read-only view of the live count.
    pub fn watch(&self) -> CounterWatch {
        CounterWatch(Arc::clone(&self.0))
    }
}

/// Read-only view of a [`ModificationCounter`].
#[derive(Debug, Clone)]
pub struct CounterWatch(Arc<AtomicU64>);

impl CounterWatch {
    /// Live count of the watched counter.
    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(ModificationCounter::new().value(), 0);
    }

    #[test]
    fn test_bump_is_monotonic() {
        let counter = ModificationCounter::new();
        assert_eq!(counter.bump(), 1);
        assert_eq!(counter.bump(), 2);
        assert_eq!(counter.value(), 2);
    }

    #[test]
    fn test_watch_sees_live_value() {
        let counter = ModificationCounter::new();
        let watch = counter.watch();

        counter.bump();
        assert_eq!(watch.value(), 1);

        let copy = watch.clone();
        counter.bump();
        assert_eq!(copy.value(), 2);
    }
}
