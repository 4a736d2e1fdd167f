use std::fmt;

use forkline_types::{Operation, Owner, Value};
use serde::Serialize;

/// One step of a batch: the operation and the value it was applied to.
#[derive(Clone, Debug, Serialize)]
#[serde(bound(serialize = ""))]
pub struct BatchStep<V: Value> {
    pub operation: Operation<V::Op>,
    pub before: V,
}

/// Operation kinds recorded in engine history.
///
/// Value operations are wrapped in [`Action::Apply`]; the engine adds its own
/// composite and provenance kinds around them.
#[derive(Clone, Debug, Serialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    bound(serialize = "")
)]
pub enum Action<V: Value> {
    /// A single value operation.
    Apply(V::Op),
    /// Ordered steps applied as one unit; undone in reverse order.
    Batch(Vec<BatchStep<V>>),
    /// Merge provenance: `from`'s value was adopted as-is.
    KeepLatest { from: Owner, value: V },
    /// Merge provenance: `from`'s value was adopted after `operations`.
    DiscardOld {
        from: Owner,
        operations: Vec<Operation<Action<V>>>,
    },
}

impl<V: Value> Action<V> {
    pub fn is_provenance(&self) -> bool {
        matches!(self, Self::KeepLatest { .. } | Self::DiscardOld { .. })
    }
}

impl<V: Value> fmt::Display for Action<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply(op) => write!(f, "{op}"),
            Self::Batch(steps) => {
                f.write_str("BATCH[")?;
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", step.operation.kind)?;
                }
                f.write_str("]")
            }
            Self::KeepLatest { from, .. } => write!(f, "KEEP_LATEST(from {from})"),
            Self::DiscardOld { from, operations } => {
                write!(f, "DISCARD_OLD(from {from}, {} operations)", operations.len())
            }
        }
    }
}
