// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Infrastructure
//!
//! Filter and facet registration at compile time, request assembly at
//! query time.
//!
//! # Architecture
//!
//! ```text
//! MappingCompiler
//!     └─→ FilterFacetCollector → QueryMetadata (per class)
//!                                    ↓
//! SearchQueryBuilder / CountQueryBuilder (AST)
//!     ↓
//!     └─→ DslTranslator → engine JSON request body
//! ```
//!
//! # Filter Values
//!
//! ```text
//! term filter   ["Paris"]            → term  { "address.city": "paris" }   (analyzed: lowercased)
//! term filter   ["a", "b"]           → terms { "tags": ["a", "b"] }
//! range filter  ["18 - 30", "65 -"]  → bool.should [ range gte/lt ... ]
//! ```

pub mod collector;
pub mod dsl;
pub mod facet;
pub mod fetch;
pub mod filter;
pub mod query_builder;
pub mod translator;

pub use collector::{FilterFacetCollector, QueryMetadata};
pub use dsl::{
    Aggregation, BoolQuery, CountRequest, QueryNode, RangeBucket, RangeQuery, SearchRequest, SortClause, SortOrder,
};
pub use facet::{range_buckets, FacetDescriptor, FacetKind, TermsFacetParams};
pub use fetch::SourceFetchContext;
pub use filter::{parse_range, FilterDescriptor, FilterKind};
pub use query_builder::{CountQueryBuilder, FilterStrategy, QueryAdapter, SearchQueryBuilder};
pub use translator::DslTranslator;
