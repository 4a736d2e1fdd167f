use std::path::PathBuf;

/// Errors produced while loading or validating an engine configuration.
///
/// Engine operations themselves never fail: undo on an empty history or a
/// merge against an older branch is a no-op rather than an error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_operation_size must be at least 1")]
    InvalidCapacity,
}
