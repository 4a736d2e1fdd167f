//! The value contract.
//!
//! A [`Value`] is the substitutable unit of state the engine versions. Copying
//! is [`Clone`], structural equality is [`PartialEq`], the text form is
//! [`Display`](std::fmt::Display), and the JSON form comes from
//! [`Serialize`].

use std::fmt;

use serde::Serialize;

/// A self-typed, immutable piece of state that can be transformed by its own
/// operation kinds and reverted to a previously captured value.
pub trait Value: Clone + PartialEq + fmt::Debug + fmt::Display + Serialize {
    /// The tagged enum of operation kinds this value understands.
    type Op: Clone + fmt::Debug + fmt::Display + Serialize;

    /// Apply `op`, returning a new value. Must not fail: kinds the value does
    /// not recognize return `self` unchanged.
    fn operate(&self, op: &Self::Op) -> Self;

    /// Reconstruct the value that existed before `op` was applied.
    ///
    /// `before` is the value captured when `op` was applied. Operations
    /// without an exact algebraic inverse return `before` verbatim.
    /// Unrecognized kinds return `self` unchanged.
    fn reverse(&self, op: &Self::Op, before: &Self) -> Self;

    /// JSON form of the value.
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct Counter(i64);

    #[derive(Clone, Debug, Serialize)]
    enum CounterOp {
        Add(i64),
        Reset,
        Unknown,
    }

    impl fmt::Display for Counter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl fmt::Display for CounterOp {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{self:?}")
        }
    }

    impl Value for Counter {
        type Op = CounterOp;

        fn operate(&self, op: &CounterOp) -> Self {
            match op {
                CounterOp::Add(n) => Counter(self.0 + n),
                CounterOp::Reset => Counter(0),
                CounterOp::Unknown => self.clone(),
            }
        }

        fn reverse(&self, op: &CounterOp, before: &Self) -> Self {
            match op {
                CounterOp::Add(n) => Counter(self.0 - n),
                CounterOp::Reset => before.clone(),
                CounterOp::Unknown => self.clone(),
            }
        }
    }

    #[test]
    fn operate_then_reverse_restores() {
        let start = Counter(5);
        for op in [CounterOp::Add(3), CounterOp::Reset] {
            let after = start.operate(&op);
            assert_eq!(after.reverse(&op, &start), start);
        }
    }

    #[test]
    fn unknown_is_noop_both_ways() {
        let value = Counter(5);
        assert_eq!(value.operate(&CounterOp::Unknown), value);
        assert_eq!(value.reverse(&CounterOp::Unknown, &Counter(0)), value);
    }

    #[test]
    fn to_json_uses_serialize() {
        assert_eq!(Counter(4).to_json().unwrap(), serde_json::json!(4));
    }
}
