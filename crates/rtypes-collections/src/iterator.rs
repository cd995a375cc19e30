//! Fail-fast snapshot iteration.
//!
//! An iterator captures two things when it is created: the traversal order
//! of the elements present at that moment, and the collection's modification
//! count. Every step first compares the captured count with the live one, so
//! a change is reported as [`IterStep::Cancelled`] even on the call that
//! would otherwise have reported exhaustion.
//!
//! ```text
//!            next_step()
//!   Active ──────────────► Active      (element returned)
//!     │
//!     ├──────────────────► Exhausted   (no element left, terminal)
//!     │
//!     └──────────────────► Cancelled   (live count changed, terminal)
//! ```

use crate::counter::CounterWatch;
use crate::error::IterationCancelled;

/// Outcome of one iteration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterStep {
    /// The next element.
    Item(String),
    /// Every element has been returned.
    Exhausted,
    /// The source collection changed after the iterator was created.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IterState {
    Active,
    Exhausted,
    Cancelled,
}

/// Iterator over a snapshot of a collection's elements.
///
/// Holds a view of the source's modification counter, never the collection
/// itself, so the collection stays free to change (which cancels this
/// iterator).
#[derive(Debug)]
pub struct SnapshotIterator {
    items: std::vec::IntoIter<String>,
    expected: u64,
    live: CounterWatch,
    state: IterState,
}

impl SnapshotIterator {
    /// Creates an iterator over `items`, bound to the current value of `live`.
    pub fn new(items: Vec<String>, live: CounterWatch) -> Self {
        Self {
            items: items.into_iter(),
            expected: live.value(),
            live,
            state: IterState::Active,
        }
    }

    /// Advances the iterator.
    ///
    /// Once `Exhausted` or `Cancelled` has been returned, every later call
    /// returns the same terminal step.
    pub fn next_step(&mut self) -> IterStep {
        match self.state {
            IterState::Exhausted => return IterStep::Exhausted,
            IterState::Cancelled => return IterStep::Cancelled,
            IterState::Active => {}
        }

        if self.live.value() != self.expected {
            self.state = IterState::Cancelled;
            return IterStep::Cancelled;
        }

        match self.items.next() {
            Some(item) => IterStep::Item(item),
            None => {
                self.state = IterState::Exhausted;
                IterStep::Exhausted
            }
        }
    }

    /// Modification count observed when the iterator was created.
    pub fn expected_count(&self) -> u64 {
        self.expected
    }

    /// Elements not yet returned.
    pub fn remaining(&self) -> usize {
        match self.state {
            IterState::Active => self.items.len(),
            _ => 0,
        }
    }

    /// True once the iterator reached a terminal state.
    pub fn is_terminated(&self) -> bool {
        self.state != IterState::Active
    }
}

/// Yields `Ok(element)` until exhaustion, or a single `Err` when cancelled.
impl Iterator for SnapshotIterator {
    type Item = Result<String, IterationCancelled>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == IterState::Cancelled {
            return None;
        }
        match self.next_step() {
            IterStep::Item(item) => Some(Ok(item)),
            IterStep::Exhausted => None,
            IterStep::Cancelled => Some(Err(IterationCancelled)),
        }
    }
}
