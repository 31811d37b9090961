//! DSL Translator
//!
//! Renders the query AST into the engine's JSON request body.
//!
//! # Request Body Shape
//!
//! ```text
//! {
//!   "query":   { "bool": { "must": [ ... ] } },
//!   "aggs":    { "<name>": { "terms": { ... } }, ... },
//!   "sort":    [ { "<field>": { "order": "asc", "unmapped_type": "keyword" } } ],
//!   "_source": { "includes": [ ... ], "excludes": [ ... ] }
//! }
//! ```

use serde_json::{json, Map, Value};

use super::dsl::{Aggregation, BoolQuery, CountRequest, QueryNode, RangeBucket, SearchRequest, SortClause};
use super::fetch::SourceFetchContext;
use crate::model::directive::ComparatorType;

/// Query DSL translator
pub struct DslTranslator;

impl DslTranslator {
    /// Full body of a search request
    pub fn search_body(request: &SearchRequest) -> Value {
        let mut body = Map::new();
        body.insert("query".into(), Self::translate(&request.query));
        if !request.aggregations.is_empty() {
            body.insert("aggs".into(), Self::translate_aggregations(&request.aggregations));
        }
        if !request.sort.is_empty() {
            body.insert(
                "sort".into(),
                Value::Array(request.sort.iter().map(Self::translate_sort).collect()),
            );
        }
        if let Some(source) = &request.source {
            body.insert("_source".into(), Self::translate_source(source));
        }
        Value::Object(body)
    }

    /// Full body of a count request
    pub fn count_body(request: &CountRequest) -> Value {
        json!({ "query": Self::translate(&request.query) })
    }

    /// Translate a query node
    pub fn translate(node: &QueryNode) -> Value {
        match node {
            QueryNode::MatchAll => json!({ "match_all": {} }),
            QueryNode::MatchPhrasePrefix { field, text, max_expansions } => json!({
                "match_phrase_prefix": {
                    field.as_str(): { "query": text, "max_expansions": max_expansions }
                }
            }),
            QueryNode::Prefix { field, value } => json!({ "prefix": { field.as_str(): value } }),
            QueryNode::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            QueryNode::Terms { field, values } => json!({ "terms": { field.as_str(): values } }),
            QueryNode::Range(range) => {
                let mut bounds = Map::new();
                if let Some(gte) = range.gte {
                    bounds.insert("gte".into(), json!(gte));
                }
                if let Some(lt) = range.lt {
                    bounds.insert("lt".into(), json!(lt));
                }
                json!({ "range": { range.field.as_str(): bounds } })
            }
            QueryNode::Bool(bool_query) => Self::translate_bool(bool_query),
            QueryNode::Nested { path, query } => json!({
                "nested": { "path": path, "query": Self::translate(query) }
            }),
            QueryNode::FunctionScore { query, script } => json!({
                "function_score": {
                    "query": Self::translate(query),
                    "script_score": { "script": script }
                }
            }),
        }
    }

    fn translate_bool(query: &BoolQuery) -> Value {
        let mut body = Map::new();
        if !query.must.is_empty() {
            body.insert("must".into(), Value::Array(query.must.iter().map(Self::translate).collect()));
        }
        if !query.should.is_empty() {
            body.insert("should".into(), Value::Array(query.should.iter().map(Self::translate).collect()));
        }
        if let Some(minimum) = query.minimum_should_match {
            body.insert("minimum_should_match".into(), json!(minimum));
        }
        json!({ "bool": body })
    }

    /// Aggregations keyed by name
    pub fn translate_aggregations(aggregations: &[Aggregation]) -> Value {
        let mut aggs = Map::new();
        for aggregation in aggregations {
            aggs.insert(aggregation.name().to_string(), Self::translate_aggregation(aggregation));
        }
        Value::Object(aggs)
    }

    fn translate_aggregation(aggregation: &Aggregation) -> Value {
        match aggregation {
            Aggregation::Terms { field, size, order, min_doc_count, exclude, .. } => {
                let mut terms = Map::new();
                terms.insert("field".into(), json!(field));
                terms.insert("size".into(), json!(size));
                terms.insert("order".into(), Self::translate_order(*order));
                if let Some(count) = min_doc_count {
                    terms.insert("min_doc_count".into(), json!(count));
                }
                if !exclude.is_empty() {
                    terms.insert("exclude".into(), json!(exclude));
                }
                json!({ "terms": terms })
            }
            Aggregation::Missing { field, .. } => json!({ "missing": { "field": field } }),
            Aggregation::Range { field, ranges, .. } => json!({
                "range": {
                    "field": field,
                    "ranges": ranges.iter().map(Self::translate_bucket).collect::<Vec<_>>()
                }
            }),
            Aggregation::Nested { path, aggregations, .. } => json!({
                "nested": { "path": path },
                "aggs": Self::translate_aggregations(aggregations)
            }),
        }
    }

    fn translate_order(order: ComparatorType) -> Value {
        match order {
            ComparatorType::Count => json!({ "_count": "desc" }),
            ComparatorType::ReverseCount => json!({ "_count": "asc" }),
            ComparatorType::Term => json!({ "_term": "desc" }),
            ComparatorType::ReverseTerm => json!({ "_term": "asc" }),
        }
    }

    fn translate_bucket(bucket: &RangeBucket) -> Value {
        let mut range = Map::new();
        if let Some(from) = bucket.from {
            range.insert("from".into(), json!(from));
        }
        if let Some(to) = bucket.to {
            range.insert("to".into(), json!(to));
        }
        Value::Object(range)
    }

    fn translate_sort(sort: &SortClause) -> Value {
        match sort {
            SortClause::Field { field, order, unmapped_type } => json!({
                field.as_str(): { "order": order.as_str(), "unmapped_type": unmapped_type }
            }),
            SortClause::Score => json!({ "_score": { "order": "desc" } }),
        }
    }

    fn translate_source(source: &SourceFetchContext) -> Value {
        json!({ "includes": source.includes(), "excludes": source.excludes() })
    }
}
