use std::fmt;
use std::sync::Arc;

use forkline_types::{Clock, Operation, OperationId, Owner, SystemClock, Value, Version};
use tracing::{debug, warn};

use crate::action::{Action, BatchStep};
use crate::config::EngineConfig;
use crate::history::{History, Revision};
use crate::merge::{MergeOutcome, MergePolicy};
use crate::state::{Snapshot, State};

/// A branch of a versioned value with undo, redo, and merge.
///
/// Every write goes through [`operate`](Self::operate),
/// [`batch_operate`](Self::batch_operate) or [`merge`](Self::merge) and is
/// recorded as a [`Revision`] in the bounded undo history. Nothing here can
/// fail: undo or redo on an empty history and merges against an older branch
/// are no-ops.
pub struct Engine<V: Value> {
    state: State<V>,
    owner: Owner,
    history: History<V>,
    redo: History<V>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl<V: Value> Engine<V> {
    /// A new document owned by `owner`, starting at `value`.
    pub fn new(owner: Owner, value: V) -> Self {
        Self::from_state(owner, State::new(value))
    }

    pub fn from_state(owner: Owner, state: State<V>) -> Self {
        let config = EngineConfig::default();
        Self {
            state,
            owner,
            history: History::new(config.max_operation_size),
            redo: History::new(config.max_operation_size),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.history.set_capacity(config.max_operation_size);
        self.redo.set_capacity(config.max_operation_size);
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// A new branch of this document for `owner`, with empty histories.
    pub fn fork(&self, owner: Owner) -> Self {
        Self {
            state: self.state.generate_branch(),
            owner,
            history: History::new(self.config.max_operation_size),
            redo: History::new(self.config.max_operation_size),
            config: self.config.clone(),
            clock: Arc::clone(&self.clock),
        }
    }

    pub fn state(&self) -> &State<V> {
        &self.state
    }

    pub fn value(&self) -> &V {
        self.state.value()
    }

    pub fn version(&self) -> &Version {
        self.state.version()
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &History<V> {
        &self.history
    }

    /// Apply `operation` and record it.
    ///
    /// The version moves to `version` when supplied, otherwise to a fresh
    /// one. Supplied versions are trusted as-is; merges compare them
    /// lexicographically. The redo history is left untouched.
    pub fn operate(&mut self, operation: Operation<V::Op>, version: Option<Version>) {
        let before = self.state.snapshot();
        let value = before.value.operate(&operation.kind);
        self.state.set_value(value, version);

        debug!(
            operation = %operation,
            version = %self.state.version(),
            "applied operation"
        );
        self.record(operation.map(Action::Apply), before);
    }

    /// Stamp `kind` with the engine clock and apply it.
    pub fn apply(&mut self, kind: V::Op) -> OperationId {
        let operation = Operation::stamped(kind, self.clock.as_ref());
        let id = operation.id();
        self.operate(operation, None);
        id
    }

    /// Apply `operations` in order as one undoable unit.
    ///
    /// The version advances once, after the last step. An empty batch
    /// records nothing.
    pub fn batch_operate(&mut self, operations: Vec<Operation<V::Op>>) {
        if operations.is_empty() {
            return;
        }

        let before = self.state.snapshot();
        let mut value = before.value.clone();
        let mut steps = Vec::with_capacity(operations.len());
        for operation in operations {
            let next = value.operate(&operation.kind);
            steps.push(BatchStep {
                operation,
                before: value,
            });
            value = next;
        }
        self.state.set_value(value, None);

        debug!(
            steps = steps.len(),
            version = %self.state.version(),
            "applied batch"
        );
        let operation = Operation::stamped(Action::Batch(steps), self.clock.as_ref());
        self.record(operation, before);
    }

    /// Undo up to `n` revisions, newest first. Returns how many were undone.
    pub fn undo(&mut self, n: usize) -> usize {
        let mut undone = 0;
        while undone < n {
            let Some(revision) = self.history.pop() else {
                break;
            };

            let value = match &revision.operation.kind {
                Action::Apply(op) => self.state.value().reverse(op, &revision.before.value),
                Action::Batch(steps) => steps
                    .iter()
                    .rev()
                    .fold(self.state.value().clone(), |value, step| {
                        value.reverse(&step.operation.kind, &step.before)
                    }),
                Action::KeepLatest { .. } | Action::DiscardOld { .. } => {
                    revision.before.value.clone()
                }
            };
            self.state
                .set_value(value, Some(revision.before.version.clone()));

            debug!(
                operation = %revision.operation,
                version = %self.state.version(),
                "undid revision"
            );
            self.redo.push(revision);
            undone += 1;
        }
        undone
    }

    /// Redo up to `n` undone revisions. Returns how many were redone.
    pub fn redo(&mut self, n: usize) -> usize {
        let mut redone = 0;
        while redone < n {
            let Some(revision) = self.redo.pop() else {
                break;
            };

            self.state.restore(revision.after.clone());
            debug!(
                operation = %revision.operation,
                version = %self.state.version(),
                "redid revision"
            );
            self.history.push(revision);
            redone += 1;
        }
        redone
    }

    /// Reconcile with `other`.
    ///
    /// When `other`'s version is newer, its value and version are adopted
    /// and a provenance revision is recorded according to the configured
    /// [`MergePolicy`]. Otherwise nothing changes.
    pub fn merge(&mut self, other: &Engine<V>) -> MergeOutcome {
        if self.state.id() != other.state.id() {
            warn!(
                ours = %self.state.id(),
                theirs = %other.state.id(),
                "merging branches of different states"
            );
        }

        if !other.version().is_newer_than(self.version()) {
            debug!(
                ours = %self.version(),
                theirs = %other.version(),
                "merge ignored, other branch is not newer"
            );
            return MergeOutcome::Ignored;
        }

        let from = other.owner.clone();
        let kind = match self.config.merge_policy {
            MergePolicy::KeepLatestState => Action::KeepLatest {
                from,
                value: other.value().clone(),
            },
            MergePolicy::DiscardOldOperations => Action::DiscardOld {
                from,
                operations: other.operations(),
            },
        };

        let before = self.state.snapshot();
        self.state
            .set_value(other.value().clone(), Some(other.version().clone()));

        let operation = Operation::stamped(kind, self.clock.as_ref());
        debug!(
            operation = %operation,
            version = %self.state.version(),
            "adopted newer branch"
        );
        self.record(operation, before);
        MergeOutcome::Adopted
    }

    /// Operations in the undo history, oldest first.
    pub fn operations(&self) -> Vec<Operation<Action<V>>> {
        self.history.operations()
    }

    /// Operations in the redo history, oldest first.
    pub fn redo_operations(&self) -> Vec<Operation<Action<V>>> {
        self.redo.operations()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Set the capacity shared by both histories, trimming them now.
    pub fn set_max_operation_size(&mut self, size: usize) {
        self.config.max_operation_size = size;
        let evicted = self.history.set_capacity(size) + self.redo.set_capacity(size);
        debug!(size, evicted, "resized history");
    }

    fn record(&mut self, operation: Operation<Action<V>>, before: Snapshot<V>) {
        let after = self.state.snapshot();
        self.history.push(Revision {
            operation,
            before,
            after,
        });
    }
}

impl<V: Value> fmt::Debug for Engine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("owner", &self.owner)
            .field("history", &self.history.len())
            .field("redo", &self.redo.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkline_text::{StringOp, StringValue};
    use forkline_types::ManualClock;
    use proptest::prelude::*;

    type TextEngine = Engine<StringValue>;

    fn engine(text: &str) -> TextEngine {
        Engine::new(Owner::new("alice"), StringValue::from(text))
    }

    fn text(engine: &TextEngine) -> &str {
        engine.value().as_str()
    }

    #[test]
    fn operate_records_and_advances_version() {
        let mut engine = engine("hello");
        let v0 = engine.version().clone();
        engine.apply(StringOp::concat(" world"));
        assert_eq!(text(&engine), "hello world");
        assert!(engine.version().is_newer_than(&v0));
        assert_eq!(engine.operations().len(), 1);
        assert!(engine.can_undo());
        assert!(!engine.can_redo());
    }

    #[test]
    fn operate_with_explicit_version() {
        let mut engine = engine("a");
        engine.operate(Operation::new(StringOp::set("b")), Some(Version::new("v-explicit")));
        assert_eq!(engine.version().as_str(), "v-explicit");
    }

    #[test]
    fn apply_stamps_with_engine_clock() {
        let clock = Arc::new(ManualClock::epoch());
        let mut engine = engine("a").with_clock(clock);
        let id = engine.apply(StringOp::ToUpperCase);
        let ops = engine.operations();
        assert_eq!(ops[0].id(), id);
        assert_eq!(ops[0].operated_at().timestamp(), 0);
    }

    #[test]
    fn undo_restores_value_and_version() {
        let mut engine = engine("abc");
        let v0 = engine.version().clone();
        engine.apply(StringOp::slice(1));
        assert_eq!(text(&engine), "bc");

        assert_eq!(engine.undo(1), 1);
        assert_eq!(text(&engine), "abc");
        assert_eq!(engine.version(), &v0);
        assert!(engine.can_redo());
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let mut engine = engine("abc");
        let v0 = engine.version().clone();
        assert_eq!(engine.undo(3), 0);
        assert_eq!(text(&engine), "abc");
        assert_eq!(engine.version(), &v0);
    }

    #[test]
    fn undo_many_stops_when_history_empties() {
        let mut engine = engine("");
        engine.apply(StringOp::concat("a"));
        engine.apply(StringOp::concat("b"));
        assert_eq!(engine.undo(5), 2);
        assert_eq!(text(&engine), "");
        assert_eq!(engine.redo_operations().len(), 2);
    }

    #[test]
    fn redo_adopts_stored_state() {
        let mut engine = engine("x");
        engine.apply(StringOp::concat("y"));
        let after_version = engine.version().clone();
        engine.undo(1);

        assert_eq!(engine.redo(1), 1);
        assert_eq!(text(&engine), "xy");
        assert_eq!(engine.version(), &after_version);
        assert!(!engine.can_redo());
        assert_eq!(engine.operations().len(), 1);
    }

    #[test]
    fn undo_redo_undo_cycles() {
        let mut engine = engine("a");
        engine.apply(StringOp::concat("b"));
        engine.apply(StringOp::concat("c"));
        engine.undo(2);
        engine.redo(2);
        assert_eq!(text(&engine), "abc");
        engine.undo(1);
        assert_eq!(text(&engine), "ab");
        assert_eq!(engine.redo(9), 1);
        assert_eq!(text(&engine), "abc");
    }

    #[test]
    fn operate_leaves_redo_history() {
        let mut engine = engine("a");
        engine.apply(StringOp::concat("b"));
        engine.undo(1);
        engine.apply(StringOp::concat("c"));
        assert_eq!(engine.redo_operations().len(), 1);
    }

    #[test]
    fn batch_reverses_order_sensitive_steps() {
        let mut engine = engine("aaa");
        let v0 = engine.version().clone();
        engine.batch_operate(vec![
            Operation::new(StringOp::replace("a", "b")),
            Operation::new(StringOp::replace("b", "c")),
            Operation::new(StringOp::concat("!")),
        ]);
        assert_eq!(text(&engine), "caa!");
        assert_eq!(engine.operations().len(), 1);

        engine.undo(1);
        assert_eq!(text(&engine), "aaa");
        assert_eq!(engine.version(), &v0);

        engine.redo(1);
        assert_eq!(text(&engine), "caa!");
    }

    #[test]
    fn empty_batch_is_noop() {
        let mut engine = engine("a");
        let v0 = engine.version().clone();
        engine.batch_operate(Vec::new());
        assert_eq!(engine.version(), &v0);
        assert!(!engine.can_undo());
    }

    #[test]
    fn history_is_bounded() {
        let mut engine = engine("").with_config(EngineConfig::default().with_max_operation_size(3));
        let ids: Vec<_> = (0..5).map(|i| engine.apply(StringOp::concat(i.to_string()))).collect();
        let kept: Vec<_> = engine.operations().iter().map(|op| op.id()).collect();
        assert_eq!(kept, &ids[2..]);
        assert_eq!(engine.undo(10), 3);
        assert_eq!(text(&engine), "01");
    }

    #[test]
    fn shrinking_cap_trims_both_histories() {
        let mut engine = engine("");
        for s in ["a", "b", "c", "d"] {
            engine.apply(StringOp::concat(s));
        }
        engine.undo(2);
        engine.set_max_operation_size(1);
        assert_eq!(engine.operations().len(), 1);
        assert_eq!(engine.redo_operations().len(), 1);
        assert_eq!(engine.config().max_operation_size, 1);
    }

    #[test]
    fn fork_shares_identity_with_empty_history() {
        let mut main = engine("doc");
        main.apply(StringOp::concat("!"));
        let branch = main.fork(Owner::new("bob"));
        assert_eq!(branch.state(), main.state());
        assert_eq!(branch.value(), main.value());
        assert!(!branch.can_undo());
        assert_eq!(branch.owner().name, "bob");
    }

    #[test]
    fn merge_adopts_newer_branch() {
        let mut a = engine("base");
        let mut b = a.fork(Owner::new("bob"));
        b.apply(StringOp::concat(" from bob"));

        assert_eq!(a.merge(&b), MergeOutcome::Adopted);
        assert_eq!(text(&a), "base from bob");
        assert_eq!(a.version(), b.version());

        let ops = a.operations();
        assert_eq!(ops.len(), 1);
        match &ops[0].kind {
            Action::KeepLatest { from, value } => {
                assert_eq!(from.name, "bob");
                assert_eq!(value.as_str(), "base from bob");
            }
            other => panic!("unexpected provenance {other}"),
        }
    }

    #[test]
    fn merge_against_older_branch_is_noop() {
        let mut a = engine("base");
        let mut b = a.fork(Owner::new("bob"));
        b.apply(StringOp::concat("?"));
        a.apply(StringOp::concat("!"));

        let before = (a.value().clone(), a.version().clone(), a.operations().len());
        assert_eq!(a.merge(&b), MergeOutcome::Ignored);
        assert_eq!(before, (a.value().clone(), a.version().clone(), a.operations().len()));

        let same = a.fork(Owner::new("clone"));
        assert_eq!(a.merge(&same), MergeOutcome::Ignored);
    }

    #[test]
    fn merge_then_undo_restores_pre_merge_state() {
        let mut a = engine("mine");
        let v0 = a.version().clone();
        let mut b = a.fork(Owner::new("bob"));
        b.apply(StringOp::set("theirs"));

        assert!(a.merge(&b).is_adopted());
        a.undo(1);
        assert_eq!(text(&a), "mine");
        assert_eq!(a.version(), &v0);

        a.redo(1);
        assert_eq!(text(&a), "theirs");
        assert_eq!(a.version(), b.version());
    }

    #[test]
    fn discard_old_records_other_operations() {
        let config = EngineConfig::default().with_merge_policy(MergePolicy::DiscardOldOperations);
        let mut a = engine("x").with_config(config);
        let mut b = a.fork(Owner::operational("bob", "ops-bot"));
        let first = b.apply(StringOp::concat("1"));
        let second = b.apply(StringOp::concat("2"));

        assert!(a.merge(&b).is_adopted());
        assert_eq!(text(&a), "x12");
        match &a.operations()[0].kind {
            Action::DiscardOld { from, operations } => {
                assert!(from.is_operational());
                let ids: Vec<_> = operations.iter().map(|op| op.id()).collect();
                assert_eq!(ids, [first, second]);
            }
            other => panic!("unexpected provenance {other}"),
        }
    }

    #[test]
    fn merge_is_idempotent() {
        let mut a = engine("a");
        let mut b = a.fork(Owner::new("bob"));
        b.apply(StringOp::concat("b"));
        assert!(a.merge(&b).is_adopted());
        assert_eq!(a.merge(&b), MergeOutcome::Ignored);
        assert_eq!(a.operations().len(), 1);
    }

    #[test]
    fn merge_across_states_still_compares_versions() {
        let mut a = engine("a");
        let b = engine("b");
        assert!(a.merge(&b).is_adopted());
        assert_eq!(text(&a), "b");
    }

    #[test]
    fn undo_of_unknown_operation_keeps_value() {
        let mut engine = engine("same");
        engine.apply(StringOp::Unknown);
        assert_eq!(text(&engine), "same");
        engine.undo(1);
        assert_eq!(text(&engine), "same");
    }

    fn any_op() -> impl Strategy<Value = StringOp> {
        let piece = "[a-c ]{0,4}";
        prop_oneof![
            piece.prop_map(|s| StringOp::set(s)),
            piece.prop_map(|s| StringOp::concat(s)),
            (piece, piece).prop_map(|(b, a)| StringOp::patch(b, a)),
            ("[a-c]{1,2}", piece).prop_map(|(from, to)| StringOp::replace(from, to)),
            ("[a-c]{1,2}", piece).prop_map(|(from, to)| StringOp::replace_all(from, to)),
            ("[ ,]{0,1}", 0usize..3).prop_map(|(s, i)| StringOp::split(s, i)),
            Just(StringOp::ToUpperCase),
            Just(StringOp::TrimEnd),
            (-5i64..5).prop_map(StringOp::slice),
        ]
    }

    proptest! {
        #[test]
        fn batch_undo_restores_exactly(
            start in "[a-c ]{0,10}",
            ops in prop::collection::vec(any_op(), 1..8),
        ) {
            let mut engine = engine(&start);
            engine.apply(StringOp::concat("!"));
            let value = engine.value().clone();
            let version = engine.version().clone();

            engine.batch_operate(ops.into_iter().map(Operation::new).collect());
            prop_assert_eq!(engine.undo(1), 1);
            prop_assert_eq!(engine.value(), &value);
            prop_assert_eq!(engine.version(), &version);
        }

        #[test]
        fn sequential_undo_walks_back(
            start in "[a-c ]{0,10}",
            ops in prop::collection::vec(any_op(), 1..8),
        ) {
            let mut engine = engine(&start);
            let mut seen = vec![(engine.value().clone(), engine.version().clone())];
            for op in ops {
                engine.apply(op);
                seen.push((engine.value().clone(), engine.version().clone()));
            }
            seen.pop();
            while let Some((value, version)) = seen.pop() {
                prop_assert_eq!(engine.undo(1), 1);
                prop_assert_eq!(engine.value(), &value);
                prop_assert_eq!(engine.version(), &version);
            }
            prop_assert!(!engine.can_undo());
        }

        #[test]
        fn history_keeps_most_recent(cap in 1usize..6, extra in 0usize..6) {
            let config = EngineConfig::default().with_max_operation_size(cap);
            let mut engine = engine("").with_config(config);
            let ids: Vec<_> = (0..cap + extra)
                .map(|i| engine.apply(StringOp::concat(i.to_string())))
                .collect();
            let kept: Vec<_> = engine.operations().iter().map(|op| op.id()).collect();
            prop_assert_eq!(kept.len(), cap);
            prop_assert_eq!(&kept[..], &ids[extra..]);
        }

        #[test]
        fn merging_older_branch_changes_nothing(
            theirs in prop::collection::vec(any_op(), 0..4),
            ours in prop::collection::vec(any_op(), 1..4),
        ) {
            let mut a = engine("base");
            let mut b = a.fork(Owner::new("bob"));
            for op in theirs {
                b.apply(op);
            }
            for op in ours {
                a.apply(op);
            }
            let value = a.value().clone();
            let version = a.version().clone();
            let len = a.operations().len();

            prop_assert_eq!(a.merge(&b), MergeOutcome::Ignored);
            prop_assert_eq!(a.value(), &value);
            prop_assert_eq!(a.version(), &version);
            prop_assert_eq!(a.operations().len(), len);
        }
    }
}
