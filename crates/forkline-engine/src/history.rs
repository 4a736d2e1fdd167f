use std::collections::VecDeque;

use forkline_types::{Operation, Value};
use serde::Serialize;
use tracing::trace;

use crate::action::Action;
use crate::state::Snapshot;

/// A history entry: the operation plus the state on either side of it.
#[derive(Clone, Debug, Serialize)]
#[serde(bound(serialize = ""))]
pub struct Revision<V: Value> {
    pub operation: Operation<Action<V>>,
    pub before: Snapshot<V>,
    pub after: Snapshot<V>,
}

/// Bounded stack of revisions. Pushing past capacity evicts the oldest.
#[derive(Clone, Debug)]
pub struct History<V: Value> {
    entries: VecDeque<Revision<V>>,
    capacity: usize,
}

impl<V: Value> History<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push a revision, returning how many old entries were evicted.
    pub fn push(&mut self, revision: Revision<V>) -> usize {
        self.entries.push_back(revision);
        self.trim()
    }

    /// Remove and return the newest revision.
    pub fn pop(&mut self) -> Option<Revision<V>> {
        self.entries.pop_back()
    }

    pub fn latest(&self) -> Option<&Revision<V>> {
        self.entries.back()
    }

    /// Change the capacity, trimming the oldest entries if needed.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity;
        self.trim()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Revisions, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Revision<V>> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Recorded operations, oldest first.
    pub fn operations(&self) -> Vec<Operation<Action<V>>> {
        self.entries.iter().map(|r| r.operation.clone()).collect()
    }

    fn trim(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.entries.pop_front() {
                trace!(operation = %oldest.operation, capacity = self.capacity, "evicted history entry");
                evicted += 1;
            }
        }
        evicted
    }
}
