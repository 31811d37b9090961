// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Named source projections.

use serde::{Deserialize, Serialize};

/// Fields to include in / exclude from returned documents for one named
/// context. Paths are kept in first-registration order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFetchContext {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl SourceFetchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<String>, include: bool) {
        let path = path.into();
        let target = if include { &mut self.includes } else { &mut self.excludes };
        if !target.contains(&path) {
            target.push(path);
        }
    }

    pub fn merge(&mut self, other: &SourceFetchContext) {
        for path in &other.includes {
            self.add(path.clone(), true);
        }
        for path in &other.excludes {
            self.add(path.clone(), false);
        }
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedupes() {
        let mut ctx = SourceFetchContext::new();
        ctx.add("name", true);
        ctx.add("name", true);
        ctx.add("secret", false);
        assert_eq!(ctx.includes(), ["name"]);
        assert_eq!(ctx.excludes(), ["secret"]);
    }

    #[test]
    fn test_merge_unions() {
        let mut a = SourceFetchContext::new();
        a.add("name", true);
        let mut b = SourceFetchContext::new();
        b.add("name", true);
        b.add("address.city", true);
        b.add("notes", false);
        a.merge(&b);
        assert_eq!(a.includes(), ["name", "address.city"]);
        assert_eq!(a.excludes(), ["notes"]);
        assert!(!a.is_empty());
        assert!(SourceFetchContext::new().is_empty());
    }
}
