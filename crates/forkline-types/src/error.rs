use thiserror::Error;

/// Errors produced when parsing foundation types from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid version string: {0:?}")]
    InvalidVersion(String),
}
