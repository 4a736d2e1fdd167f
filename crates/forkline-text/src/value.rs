use std::fmt;

use forkline_diff::Patch;
use forkline_types::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SchemaError;
use crate::op::StringOp;
use crate::schema::StringSchema;

/// An immutable string value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringValue(String);

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Construct a value, failing fast if it violates `schema`.
    pub fn validated(value: impl Into<String>, schema: &StringSchema) -> Result<Self, SchemaError> {
        let value = Self(value.into());
        schema.validate(&value)?;
        Ok(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn patched(&self, before: &str, after: &str) -> Self {
        let outcome = Patch::make(before, after).apply(&self.0);
        if !outcome.all_applied() {
            debug!(
                skipped = outcome.applied.iter().filter(|a| !**a).count(),
                hunks = outcome.applied.len(),
                "patch hunks could not be located"
            );
        }
        Self(outcome.text)
    }

    fn sliced(&self, start: i64, end: Option<i64>) -> Self {
        let len = self.char_len() as i64;
        let resolve = |index: i64| {
            if index < 0 {
                (len + index).max(0)
            } else {
                index.min(len)
            }
        };
        let start = resolve(start);
        let end = end.map_or(len, resolve);
        if start >= end {
            return Self::default();
        }
        Self(
            self.0
                .chars()
                .skip(start as usize)
                .take((end - start) as usize)
                .collect(),
        )
    }

    fn segment(&self, separator: &str, index: usize) -> Self {
        let segment = if separator.is_empty() {
            self.0.chars().nth(index).map(String::from)
        } else {
            self.0.split(separator).nth(index).map(str::to_string)
        };
        Self(segment.unwrap_or_default())
    }
}

impl Value for StringValue {
    type Op = StringOp;

    fn operate(&self, op: &StringOp) -> Self {
        match op {
            StringOp::Set { value } => Self(value.clone()),
            StringOp::Patch { before, after } => self.patched(before, after),
            StringOp::Concat { value } => Self(format!("{}{value}", self.0)),
            StringOp::Replace { from, to, all: false } => Self(self.0.replacen(from.as_str(), to, 1)),
            StringOp::Replace { from, to, all: true } => Self(self.0.replace(from.as_str(), to)),
            StringOp::Split { separator, index } => self.segment(separator, *index),
            StringOp::Join { separator, values } => {
                let mut parts = Vec::with_capacity(values.len() + 1);
                parts.push(self.0.as_str());
                parts.extend(values.iter().map(String::as_str));
                Self(parts.join(separator))
            }
            StringOp::ToUpperCase => Self(self.0.to_uppercase()),
            StringOp::ToLowerCase => Self(self.0.to_lowercase()),
            StringOp::Trim => Self(self.0.trim().to_string()),
            StringOp::TrimStart => Self(self.0.trim_start().to_string()),
            StringOp::TrimEnd => Self(self.0.trim_end().to_string()),
            StringOp::Slice { start, end } => self.sliced(*start, *end),
            StringOp::Unknown => self.clone(),
        }
    }

    fn reverse(&self, op: &StringOp, before: &Self) -> Self {
        match op {
            StringOp::Concat { value } => match self.0.strip_suffix(value.as_str()) {
                Some(stripped) => Self(stripped.to_string()),
                None => before.clone(),
            },
            StringOp::Unknown => self.clone(),
            // Lossy or ambiguous to invert: restore the captured value.
            _ => before.clone(),
        }
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StringValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for StringValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
