use forkline_types::{StateId, Value, Version};
use serde::Serialize;

/// A version paired with the value it labels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot<V> {
    pub version: Version,
    pub value: V,
}

/// A versioned value.
///
/// The id names the logical document and is shared by every branch of it;
/// the version is the branch's logical clock and changes with every write.
/// Two states are equal when both id and version match.
#[derive(Clone, Debug, Serialize)]
pub struct State<V> {
    id: StateId,
    version: Version,
    value: V,
}

impl<V: Value> State<V> {
    pub fn new(value: V) -> Self {
        Self {
            id: StateId::new(),
            version: Version::generate(),
            value,
        }
    }

    pub fn with_version(id: StateId, version: Version, value: V) -> Self {
        Self { id, version, value }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Advance to a freshly generated version and return it.
    pub fn add_version(&mut self) -> &Version {
        self.version = Version::generate();
        &self.version
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replace the value. The version moves with it: to `version` when
    /// supplied, otherwise to a fresh one.
    pub fn set_value(&mut self, value: V, version: Option<Version>) {
        self.value = value;
        self.version = version.unwrap_or_else(Version::generate);
    }

    /// A new branch of the same document at the same version.
    pub fn generate_branch(&self) -> Self {
        self.clone()
    }

    pub fn snapshot(&self) -> Snapshot<V> {
        Snapshot {
            version: self.version.clone(),
            value: self.value.clone(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot<V>) {
        self.value = snapshot.value;
        self.version = snapshot.version;
    }
}

impl<V> PartialEq for State<V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.version == other.version
    }
}

impl<V> Eq for State<V> {}
