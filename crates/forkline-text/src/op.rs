use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation kinds understood by [`StringValue`](crate::StringValue).
///
/// Serialized internally tagged on `"type"`. A tag this enum does not know
/// decodes to [`StringOp::Unknown`], which every value treats as a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StringOp {
    /// Replace the whole value.
    Set { value: String },
    /// Replay the edit that turns `before` into `after`.
    Patch { before: String, after: String },
    /// Append `value`.
    Concat { value: String },
    /// Replace the first (or every) occurrence of `from` with `to`.
    Replace {
        from: String,
        to: String,
        #[serde(default)]
        all: bool,
    },
    /// Keep only the `index`-th segment between `separator`s.
    Split {
        separator: String,
        #[serde(default)]
        index: usize,
    },
    /// Join the value and `values` with `separator`.
    Join {
        separator: String,
        values: Vec<String>,
    },
    ToUpperCase,
    ToLowerCase,
    Trim,
    TrimStart,
    TrimEnd,
    /// Character slice; negative indices count from the end.
    Slice {
        start: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<i64>,
    },
    #[serde(other)]
    Unknown,
}

impl StringOp {
    pub fn set(value: impl Into<String>) -> Self {
        Self::Set {
            value: value.into(),
        }
    }

    pub fn patch(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self::Patch {
            before: before.into(),
            after: after.into(),
        }
    }

    pub fn concat(value: impl Into<String>) -> Self {
        Self::Concat {
            value: value.into(),
        }
    }

    pub fn replace(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Replace {
            from: from.into(),
            to: to.into(),
            all: false,
        }
    }

    pub fn replace_all(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Replace {
            from: from.into(),
            to: to.into(),
            all: true,
        }
    }

    pub fn split(separator: impl Into<String>, index: usize) -> Self {
        Self::Split {
            separator: separator.into(),
            index,
        }
    }

    pub fn join<I, S>(separator: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Join {
            separator: separator.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn slice(start: i64) -> Self {
        Self::Slice { start, end: None }
    }

    pub fn slice_range(start: i64, end: i64) -> Self {
        Self::Slice {
            start,
            end: Some(end),
        }
    }

    /// The wire tag of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Set { .. } => "SET",
            Self::Patch { .. } => "PATCH",
            Self::Concat { .. } => "CONCAT",
            Self::Replace { .. } => "REPLACE",
            Self::Split { .. } => "SPLIT",
            Self::Join { .. } => "JOIN",
            Self::ToUpperCase => "TO_UPPER_CASE",
            Self::ToLowerCase => "TO_LOWER_CASE",
            Self::Trim => "TRIM",
            Self::TrimStart => "TRIM_START",
            Self::TrimEnd => "TRIM_END",
            Self::Slice { .. } => "SLICE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StringOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        match self {
            Self::Set { value } | Self::Concat { value } => write!(f, "{tag}({value:?})"),
            Self::Patch { before, after } => write!(f, "{tag}({before:?} -> {after:?})"),
            Self::Replace { from, to, all } => {
                let scope = if *all { ", all" } else { "" };
                write!(f, "{tag}({from:?} -> {to:?}{scope})")
            }
            Self::Split { separator, index } => write!(f, "{tag}({separator:?}, {index})"),
            Self::Join { separator, values } => write!(f, "{tag}({separator:?}, {values:?})"),
            Self::Slice { start, end: Some(end) } => write!(f, "{tag}({start}, {end})"),
            Self::Slice { start, end: None } => write!(f, "{tag}({start})"),
            _ => f.write_str(tag),
        }
    }
}
