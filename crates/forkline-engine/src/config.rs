use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::merge::MergePolicy;

/// Engine configuration.
///
/// ```toml
/// max_operation_size = 200
/// merge_policy = "discard_old_operations"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Capacity shared by the undo and redo histories.
    pub max_operation_size: usize,
    /// Policy applied by `merge`.
    pub merge_policy: MergePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_operation_size: 1000,
            merge_policy: MergePolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_max_operation_size(mut self, size: usize) -> Self {
        self.max_operation_size = size;
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_operation_size == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        Ok(())
    }
}
