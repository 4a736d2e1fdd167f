use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::id::OperationId;

/// An identified, timestamped description of a single state mutation.
///
/// The envelope is generic over the operation *kind*: a value type supplies
/// its own tagged enum of kinds, and the engine wraps those in its own kinds
/// (batches, merge provenance) without changing the identity or timestamp.
///
/// Two operations are equal iff their ids are equal, regardless of kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Operation<K> {
    pub id: OperationId,
    pub operated_at: DateTime<Utc>,
    pub kind: K,
}

impl<K> Operation<K> {
    /// Create an operation with a fresh id, stamped by the system clock.
    pub fn new(kind: K) -> Self {
        Self::stamped(kind, &SystemClock)
    }

    /// Create an operation with a fresh id, stamped by `clock`.
    pub fn stamped(kind: K, clock: &dyn Clock) -> Self {
        Self {
            id: OperationId::new(),
            operated_at: clock.now(),
            kind,
        }
    }

    /// Create an operation with an explicitly supplied identity.
    pub fn with_id(id: OperationId, operated_at: DateTime<Utc>, kind: K) -> Self {
        Self {
            id,
            operated_at,
            kind,
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn operated_at(&self) -> DateTime<Utc> {
        self.operated_at
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Rewrap the kind, keeping id and timestamp.
    pub fn map<U>(self, f: impl FnOnce(K) -> U) -> Operation<U> {
        Operation {
            id: self.id,
            operated_at: self.operated_at,
            kind: f(self.kind),
        }
    }
}

impl<K> PartialEq for Operation<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for Operation<K> {}

impl<K> Hash for Operation<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K: fmt::Display> fmt::Display for Operation<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.id.short_id())
    }
}
