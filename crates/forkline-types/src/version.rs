use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Time-sortable version string acting as a state's logical clock.
///
/// Generated versions are the hyphenated lowercase form of a UUID v7: the
/// leading 48 bits are the millisecond timestamp, so lexicographic order of
/// the strings is generation order. A version is *not* a counter; "newer"
/// means lexicographically greater.
///
/// Versions supplied explicitly through [`Version::new`] are trusted as-is.
/// Ordering across actors is only meaningful when every actor honours the
/// same fixed-structure, monotonic generator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Generate a fresh version that sorts after every version previously
    /// generated in this process.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().hyphenated().to_string())
    }

    /// Wrap an explicitly supplied version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this version sorts strictly after `other`.
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Short representation (first 13 characters, the timestamp prefix).
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(13)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::generate()
    }
}

impl FromStr for Version {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(TypeError::InvalidVersion(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_versions_are_monotonic() {
        let mut previous = Version::generate();
        for _ in 0..1000 {
            let next = Version::generate();
            assert!(next.is_newer_than(&previous));
            previous = next;
        }
    }

    #[test]
    fn generated_versions_have_fixed_width() {
        let a = Version::generate();
        let b = Version::generate();
        assert_eq!(a.as_str().len(), 36);
        assert_eq!(a.as_str().len(), b.as_str().len());
    }

    #[test]
    fn comparison_is_lexicographic() {
        assert!(Version::new("b") > Version::new("a"));
        assert!(Version::new("10") < Version::new("9"));
        assert!(!Version::new("a").is_newer_than(&Version::new("a")));
    }

    #[test]
    fn parse_rejects_blank() {
        assert!("   ".parse::<Version>().is_err());
        assert_eq!("v1".parse::<Version>().unwrap(), Version::new("v1"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let version = Version::new("0190-abc");
        assert_eq!(serde_json::to_string(&version).unwrap(), "\"0190-abc\"");
    }

    #[test]
    fn short_is_timestamp_prefix() {
        let version = Version::generate();
        assert_eq!(version.short(), &version.as_str()[..13]);
        assert_eq!(Version::new("abc").short(), "abc");
    }

    proptest! {
        #[test]
        fn ordering_matches_string_ordering(a in "[0-9a-f-]{0,36}", b in "[0-9a-f-]{0,36}") {
            prop_assert_eq!(Version::new(a.clone()).cmp(&Version::new(b.clone())), a.cmp(&b));
        }
    }
}
