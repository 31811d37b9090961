// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter descriptors.
//!
//! A [`FilterDescriptor`] knows where a filterable field lives (its nested
//! root, if any, and the path below that root) and how to turn caller
//! values into query fragments.
//!
//! # Range value syntax
//!
//! ```text
//! "10 - 20"    10 <= x < 20
//! "10 - *"     x >= 10          ("10 -" and "10" mean the same)
//! "* - 20"     x < 20           ("- 20" means the same)
//! ```

use serde::{Deserialize, Serialize};

use super::dsl::QueryNode;
use crate::error::QueryError;
use crate::path::FieldPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Exact value match; several values match any of them.
    Term,
    /// Numeric ranges in the syntax above; several values match any of them.
    Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    kind: FilterKind,
    nested_path: Option<FieldPath>,
    path: FieldPath,
    analyzed: bool,
}

impl FilterDescriptor {
    pub fn term(nested_path: Option<FieldPath>, path: FieldPath, analyzed: bool) -> Self {
        Self { kind: FilterKind::Term, nested_path, path, analyzed }
    }

    pub fn range(nested_path: Option<FieldPath>, path: FieldPath) -> Self {
        Self { kind: FilterKind::Range, nested_path, path, analyzed: false }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Nested root this field lives under.
    pub fn nested_path(&self) -> Option<&FieldPath> {
        self.nested_path.as_ref()
    }

    /// Path relative to the nested root (the full path when not nested).
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn is_nested(&self) -> bool {
        self.nested_path.is_some()
    }

    /// Whether the field is tokenized, so filter values must be lowercased.
    pub fn analyzed(&self) -> bool {
        self.analyzed
    }

    pub fn field_path(&self) -> FieldPath {
        match &self.nested_path {
            Some(root) => root.join(&self.path),
            None => self.path.clone(),
        }
    }

    /// Full dotted path of the field in the index document.
    pub fn es_field_name(&self) -> String {
        self.field_path().to_string()
    }

    /// One fragment matching any of `values`.
    pub fn build(&self, values: &[String]) -> Result<QueryNode, QueryError> {
        let field = self.es_field_name();
        if values.is_empty() {
            return Err(QueryError::EmptyFilterValues(field));
        }
        match self.kind {
            FilterKind::Term => {
                let mut values: Vec<String> = values.iter().map(|v| self.normalize(v)).collect();
                if values.len() == 1 {
                    Ok(QueryNode::term(field, values.remove(0)))
                } else {
                    Ok(QueryNode::terms(field, values))
                }
            }
            FilterKind::Range => {
                let ranges = values
                    .iter()
                    .map(|v| parse_range(&field, v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(QueryNode::any_of(ranges))
            }
        }
    }

    /// One fragment per value, for callers that require all of them.
    pub fn build_each(&self, values: &[String]) -> Result<Vec<QueryNode>, QueryError> {
        if values.is_empty() {
            return Err(QueryError::EmptyFilterValues(self.es_field_name()));
        }
        values
            .iter()
            .map(|value| self.build(std::slice::from_ref(value)))
            .collect()
    }

    fn normalize(&self, value: &str) -> String {
        if self.analyzed {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }
}

/// Parse one range value into a range fragment on `field`.
pub fn parse_range(field: &str, value: &str) -> Result<QueryNode, QueryError> {
    let invalid = || QueryError::InvalidRangeValue {
        field: field.to_string(),
        value: value.to_string(),
    };

    let padded = format!(" {} ", value.trim());
    let (from, to) = match padded.split_once(" - ") {
        Some((from, to)) => (from.trim(), to.trim()),
        None => (value.trim(), ""),
    };

    let bound = |raw: &str| -> Result<Option<f64>, QueryError> {
        if raw.is_empty() || raw == "*" {
            Ok(None)
        } else {
            raw.parse::<f64>().map(Some).map_err(|_| invalid())
        }
    };

    let gte = bound(from)?;
    let lt = bound(to)?;
    if gte.is_none() && lt.is_none() {
        return Err(invalid());
    }
    Ok(QueryNode::range(field, gte, lt))
}
