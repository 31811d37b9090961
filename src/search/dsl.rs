// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query DSL - AST for search requests
//!
//! Query fragments, aggregations and sort clauses as plain data. The
//! [`DslTranslator`](super::translator::DslTranslator) renders them into the
//! engine's JSON request body.
//!
//! # Example
//!
//! ```rust
//! use es_mapping::search::QueryNode;
//!
//! // Single fragment
//! let city = QueryNode::term("address.city", "paris");
//!
//! // Nested envelope
//! let nested = QueryNode::nested("address", city);
//!
//! // Boolean combination
//! let query = QueryNode::all_of(vec![QueryNode::match_all(), nested]);
//! ```

use serde::{Deserialize, Serialize};

use crate::model::directive::ComparatorType;
use crate::search::fetch::SourceFetchContext;

// =============================================================================
// Queries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryNode {
    MatchAll,
    MatchPhrasePrefix {
        field: String,
        text: String,
        max_expansions: u32,
    },
    Prefix {
        field: String,
        value: String,
    },
    Term {
        field: String,
        value: String,
    },
    Terms {
        field: String,
        values: Vec<String>,
    },
    Range(RangeQuery),
    Bool(BoolQuery),
    Nested {
        path: String,
        query: Box<QueryNode>,
    },
    FunctionScore {
        query: Box<QueryNode>,
        script: String,
    },
}

/// Numeric range with an inclusive lower and exclusive upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    pub field: String,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    pub must: Vec<QueryNode>,
    pub should: Vec<QueryNode>,
    pub minimum_should_match: Option<u32>,
}

impl QueryNode {
    pub fn match_all() -> Self {
        QueryNode::MatchAll
    }

    pub fn phrase_prefix(field: impl Into<String>, text: impl Into<String>, max_expansions: u32) -> Self {
        QueryNode::MatchPhrasePrefix {
            field: field.into(),
            text: text.into(),
            max_expansions,
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryNode::Prefix { field: field.into(), value: value.into() }
    }

    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryNode::Term { field: field.into(), value: value.into() }
    }

    pub fn terms(field: impl Into<String>, values: Vec<String>) -> Self {
        QueryNode::Terms { field: field.into(), values }
    }

    pub fn range(field: impl Into<String>, gte: Option<f64>, lt: Option<f64>) -> Self {
        QueryNode::Range(RangeQuery { field: field.into(), gte, lt })
    }

    pub fn nested(path: impl Into<String>, query: QueryNode) -> Self {
        QueryNode::Nested { path: path.into(), query: Box::new(query) }
    }

    pub fn function_score(query: QueryNode, script: impl Into<String>) -> Self {
        QueryNode::FunctionScore { query: Box::new(query), script: script.into() }
    }

    /// AND of the clauses. Empty yields match-all, a single clause is
    /// returned as is.
    pub fn all_of(mut clauses: Vec<QueryNode>) -> Self {
        match clauses.len() {
            0 => QueryNode::MatchAll,
            1 => clauses.remove(0),
            _ => QueryNode::Bool(BoolQuery { must: clauses, ..BoolQuery::default() }),
        }
    }

    /// OR of the clauses: at least one must match. Empty yields match-all.
    pub fn any_of(mut clauses: Vec<QueryNode>) -> Self {
        match clauses.len() {
            0 => QueryNode::MatchAll,
            1 => clauses.remove(0),
            _ => QueryNode::Bool(BoolQuery {
                should: clauses,
                minimum_should_match: Some(1),
                ..BoolQuery::default()
            }),
        }
    }
}

// =============================================================================
// Aggregations
// =============================================================================

/// Bucket of a range aggregation: `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Aggregation {
    Terms {
        name: String,
        field: String,
        size: u32,
        order: ComparatorType,
        min_doc_count: Option<u64>,
        exclude: Vec<String>,
    },
    Missing {
        name: String,
        field: String,
    },
    Range {
        name: String,
        field: String,
        ranges: Vec<RangeBucket>,
    },
    Nested {
        name: String,
        path: String,
        aggregations: Vec<Aggregation>,
    },
}

impl Aggregation {
    pub fn name(&self) -> &str {
        match self {
            Aggregation::Terms { name, .. }
            | Aggregation::Missing { name, .. }
            | Aggregation::Range { name, .. }
            | Aggregation::Nested { name, .. } => name,
        }
    }
}

// =============================================================================
// Sort and requests
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortClause {
    /// Sort on a field; indices lacking it treat it as `unmapped_type`.
    Field {
        field: String,
        order: SortOrder,
        unmapped_type: String,
    },
    Score,
}

/// A fully assembled search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub indices: Vec<String>,
    pub types: Vec<String>,
    pub query: QueryNode,
    pub aggregations: Vec<Aggregation>,
    pub sort: Vec<SortClause>,
    pub source: Option<SourceFetchContext>,
}

/// A count request: same query composition, no aggregations or sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountRequest {
    pub indices: Vec<String>,
    pub types: Vec<String>,
    pub query: QueryNode,
}

/// `/<indices>/<types>/<action>`, omitting empty parts.
pub(crate) fn endpoint(indices: &[String], types: &[String], action: &str) -> String {
    let mut path = String::new();
    for part in [indices.join(","), types.join(",")] {
        if !part.is_empty() {
            path.push('/');
            path.push_str(&part);
        }
    }
    path.push('/');
    path.push_str(action);
    path
}

impl SearchRequest {
    pub fn endpoint(&self) -> String {
        endpoint(&self.indices, &self.types, "_search")
    }
}

impl CountRequest {
    pub fn endpoint(&self) -> String {
        endpoint(&self.indices, &self.types, "_count")
    }
}
