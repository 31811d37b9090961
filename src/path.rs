// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Dotted field paths.
//!
//! A [`FieldPath`] addresses a property inside an index document
//! (`address.city`). Paths compose structurally rather than by string
//! concatenation, so nested roots and relative filter paths never need
//! substring arithmetic.
//!
//! ```
//! use es_mapping::FieldPath;
//!
//! let address = FieldPath::root().child("address");
//! let city = address.child("city");
//! assert_eq!(city.to_string(), "address.city");
//! assert_eq!(city.strip_prefix(&address).unwrap().to_string(), "city");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The empty path (document root).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path. Empty segments are dropped, so `""` is the root
    /// and `"a..b"` equals `"a.b"`.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Append one or more segments (the argument may itself be dotted).
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        self.join(&Self::parse(name))
    }

    #[must_use]
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// The path relative to `prefix`, or `None` if `prefix` is not an
    /// ancestor (or equal) of this path.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &FieldPath) -> Option<FieldPath> {
        if prefix.segments.len() > self.segments.len() {
            return None;
        }
        let (head, tail) = self.segments.split_at(prefix.segments.len());
        if head == prefix.segments.as_slice() {
            Some(Self { segments: tail.to_vec() })
        } else {
            None
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Last segment.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(Self::parse(&dotted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        let root = FieldPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "");
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_child_accepts_dotted() {
        let path = FieldPath::root().child("address").child("geo.lat");
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "address.geo.lat");
        assert_eq!(path.name(), Some("lat"));
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        assert_eq!(FieldPath::parse("a..b."), FieldPath::parse("a.b"));
        assert!(FieldPath::parse("").is_root());
    }

    #[test]
    fn test_strip_prefix() {
        let full = FieldPath::parse("address.city.name");
        let prefix = FieldPath::parse("address");
        assert_eq!(full.strip_prefix(&prefix), Some(FieldPath::parse("city.name")));
        assert_eq!(full.strip_prefix(&full), Some(FieldPath::root()));
        assert_eq!(full.strip_prefix(&FieldPath::parse("addr")), None);
        assert_eq!(prefix.strip_prefix(&full), None);
    }

    #[test]
    fn test_strip_prefix_matches_whole_segments() {
        // "address" must not be treated as a prefix of "addresses"
        let full = FieldPath::parse("addresses.city");
        assert_eq!(full.strip_prefix(&FieldPath::parse("address")), None);
    }

    #[test]
    fn test_parent() {
        let path = FieldPath::parse("a.b.c");
        assert_eq!(path.parent(), Some(FieldPath::parse("a.b")));
    }

    #[test]
    fn test_serde_as_dotted_string() {
        let path = FieldPath::parse("address.city");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"address.city\"");
        let back: FieldPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
