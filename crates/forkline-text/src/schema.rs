//! Length and pattern bounds for string values.
//!
//! Schemas deserialize from the JSON-schema keywords `minLength`,
//! `maxLength` and `pattern`:
//!
//! ```
//! use forkline_text::{StringSchema, StringValue};
//!
//! let schema: StringSchema =
//!     serde_json::from_str(r#"{"minLength": 1, "pattern": "^[a-z-]+$"}"#).unwrap();
//! assert!(StringValue::validated("page-title", &schema).is_ok());
//! assert!(StringValue::validated("Page Title", &schema).is_err());
//! ```

use regex::Regex;
use serde::Deserialize;

use crate::error::SchemaError;
use crate::value::StringValue;

/// Bounds a string value must satisfy.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "SchemaDocument")]
pub struct StringSchema {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SchemaDocument {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<String>,
}

impl TryFrom<SchemaDocument> for StringSchema {
    type Error = SchemaError;

    fn try_from(doc: SchemaDocument) -> Result<Self, Self::Error> {
        let mut schema = Self::new();
        if let Some(min) = doc.min_length {
            schema = schema.min_length(min);
        }
        if let Some(max) = doc.max_length {
            schema = schema.max_length(max);
        }
        if let Some(pattern) = doc.pattern {
            schema = schema.pattern(&pattern)?;
        }
        schema.check_bounds()?;
        Ok(schema)
    }
}

impl StringSchema {
    /// A schema that accepts every string.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require the value to match `pattern` (unanchored, as in JSON schema).
    pub fn pattern(mut self, pattern: &str) -> Result<Self, SchemaError> {
        let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }

    /// Check `value` against every bound, reporting the first violation.
    pub fn validate(&self, value: &StringValue) -> Result<(), SchemaError> {
        self.check_bounds()?;
        let actual = value.char_len();

        if let Some(min) = self.min_length {
            if actual < min {
                return Err(SchemaError::TooShort { min, actual });
            }
        }

        if let Some(max) = self.max_length {
            if actual > max {
                return Err(SchemaError::TooLong { max, actual });
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value.as_str()) {
                return Err(SchemaError::PatternMismatch {
                    pattern: pattern.as_str().to_string(),
                });
            }
        }

        Ok(())
    }

    fn check_bounds(&self) -> Result<(), SchemaError> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min > max => Err(SchemaError::InvertedBounds { min, max }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> StringValue {
        StringValue::from(s)
    }

    #[test]
    fn empty_schema_accepts_anything() {
        let schema = StringSchema::new();
        assert!(schema.validate(&v("")).is_ok());
        assert!(schema.validate(&v("anything at all")).is_ok());
    }

    #[test]
    fn length_bounds_count_characters() {
        let schema = StringSchema::new().min_length(2).max_length(4);
        assert_eq!(
            schema.validate(&v("a")),
            Err(SchemaError::TooShort { min: 2, actual: 1 })
        );
        assert_eq!(
            schema.validate(&v("abcde")),
            Err(SchemaError::TooLong { max: 4, actual: 5 })
        );
        assert!(schema.validate(&v("éééé")).is_ok());
    }

    #[test]
    fn pattern_mismatch_is_reported() {
        let schema = StringSchema::new().pattern("^[0-9]+$").unwrap();
        assert!(schema.validate(&v("123")).is_ok());
        let err = schema.validate(&v("12a")).unwrap_err();
        assert!(matches!(err, SchemaError::PatternMismatch { .. }));
        assert!(err.to_string().contains("^[0-9]+$"));
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let err = StringSchema::new().pattern("(unclosed").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let schema = StringSchema::new().min_length(5).max_length(1);
        assert_eq!(
            schema.validate(&v("abc")),
            Err(SchemaError::InvertedBounds { min: 5, max: 1 })
        );
    }

    #[test]
    fn validated_constructor_fails_fast() {
        let schema = StringSchema::new().max_length(3);
        assert!(StringValue::validated("abc", &schema).is_ok());
        assert!(StringValue::validated("abcd", &schema).is_err());
    }

    #[test]
    fn deserializes_from_json_schema_keywords() {
        let schema: StringSchema =
            serde_json::from_str(r#"{"minLength": 2, "maxLength": 3, "pattern": "^x"}"#).unwrap();
        assert!(schema.validate(&v("xy")).is_ok());
        assert!(schema.validate(&v("yy")).is_err());
        assert!(schema.validate(&v("xyzw")).is_err());
    }

    #[test]
    fn deserialization_rejects_bad_documents() {
        assert!(serde_json::from_str::<StringSchema>(r#"{"pattern": "("}"#).is_err());
        assert!(serde_json::from_str::<StringSchema>(r#"{"minLength": 3, "maxLength": 1}"#).is_err());
        assert!(serde_json::from_str::<StringSchema>(r#"{"format": "email"}"#).is_err());
    }
}
