use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::OwnerId;

/// The actor responsible for a branch and the operations applied to it.
///
/// Owners are pure values: they are only consulted for merge provenance and
/// display. An *operational* owner additionally names the operator acting on
/// the owner's behalf (a service account, an automation, a delegate).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl Owner {
    /// Create an owner with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(OwnerId::new(), name)
    }

    /// Create an owner with an explicit identity.
    pub fn with_id(id: OwnerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            operator: None,
        }
    }

    /// Create an operational owner with a fresh identity.
    pub fn operational(name: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            operator: Some(operator.into()),
            ..Self::new(name)
        }
    }

    pub fn is_operational(&self) -> bool {
        self.operator.is_some()
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operator {
            Some(operator) => write!(f, "{} ({operator})", self.name),
            None => f.write_str(&self.name),
        }
    }
}
