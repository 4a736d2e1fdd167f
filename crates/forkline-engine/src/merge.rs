use serde::{Deserialize, Serialize};

/// How a branch reconciles with a newer one.
///
/// Both policies adopt the other branch's value and version when its version
/// is newer, and do nothing otherwise. They differ in the provenance entry
/// recorded in history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Record the adopted value itself.
    #[default]
    KeepLatestState,
    /// Record the operations the other branch applied.
    DiscardOldOperations,
}

/// Result of a merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The other branch was newer and its state was adopted.
    Adopted,
    /// The other branch was the same age or older; nothing changed.
    Ignored,
}

impl MergeOutcome {
    pub fn is_adopted(self) -> bool {
        self == Self::Adopted
    }
}
