/// Schema violations reported when validating a string value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("value is {actual} characters long, minimum is {min}")]
    TooShort { min: usize, actual: usize },

    #[error("value is {actual} characters long, maximum is {max}")]
    TooLong { max: usize, actual: usize },

    #[error("value does not match pattern {pattern:?}")]
    PatternMismatch { pattern: String },

    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("minimum length {min} exceeds maximum length {max}")]
    InvertedBounds { min: usize, max: usize },
}
