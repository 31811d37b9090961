// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Facet descriptors.
//!
//! A facet is a filter that also knows how to aggregate over its field.
//! Terms facets emit a terms aggregation plus a companion `missing`
//! aggregation; range facets emit one range aggregation. Facets under a
//! nested root are wrapped in a `nested` aggregation on that root.

use serde::{Deserialize, Serialize};

use super::dsl::{Aggregation, RangeBucket};
use super::filter::FilterDescriptor;
use crate::config::MappingConfig;
use crate::model::directive::{ComparatorType, TermsFacetSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsFacetParams {
    pub size: u32,
    pub order: ComparatorType,
    /// Also return terms with zero matching documents.
    pub all_terms: bool,
    pub exclude: Vec<String>,
}

impl From<&TermsFacetSpec> for TermsFacetParams {
    fn from(spec: &TermsFacetSpec) -> Self {
        Self {
            size: spec.size,
            order: spec.order,
            all_terms: spec.all_terms,
            exclude: spec.exclude.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FacetKind {
    Terms(TermsFacetParams),
    Range(Vec<RangeBucket>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetDescriptor {
    filter: FilterDescriptor,
    kind: FacetKind,
}

impl FacetDescriptor {
    pub fn terms(filter: FilterDescriptor, params: TermsFacetParams) -> Self {
        Self { filter, kind: FacetKind::Terms(params) }
    }

    /// `None` if the boundaries do not form valid buckets, see [`range_buckets`].
    pub fn range(filter: FilterDescriptor, boundaries: &[f64]) -> Option<Self> {
        range_buckets(boundaries).map(|buckets| Self { filter, kind: FacetKind::Range(buckets) })
    }

    pub fn filter(&self) -> &FilterDescriptor {
        &self.filter
    }

    pub fn kind(&self) -> &FacetKind {
        &self.kind
    }

    /// Aggregation name; also the key facets are de-duplicated by.
    pub fn name(&self) -> String {
        self.filter.es_field_name()
    }

    pub fn aggregations(&self, config: &MappingConfig) -> Vec<Aggregation> {
        let field = self.filter.es_field_name();
        let aggregations = match &self.kind {
            FacetKind::Terms(params) => vec![
                Aggregation::Terms {
                    name: field.clone(),
                    field: field.clone(),
                    size: params.size,
                    order: params.order,
                    min_doc_count: params.all_terms.then_some(0),
                    exclude: params.exclude.clone(),
                },
                Aggregation::Missing {
                    name: format!("{}{}", config.missing_bucket_prefix, field),
                    field: field.clone(),
                },
            ],
            FacetKind::Range(buckets) => vec![Aggregation::Range {
                name: field.clone(),
                field: field.clone(),
                ranges: buckets.clone(),
            }],
        };

        match self.filter.nested_path() {
            Some(root) => vec![Aggregation::Nested {
                name: format!("{}{}", field, config.nested_aggregation_suffix),
                path: root.to_string(),
                aggregations,
            }],
            None => aggregations,
        }
    }
}

/// Buckets from an even list of at least two boundaries: everything below
/// the first, the interior pairs, everything from the last.
///
/// `[10, 20, 30, 40]` gives `< 10`, `20..30`, `>= 40`.
pub fn range_buckets(boundaries: &[f64]) -> Option<Vec<RangeBucket>> {
    let n = boundaries.len();
    if n < 2 || n % 2 != 0 {
        return None;
    }

    let mut buckets = Vec::with_capacity(n / 2 + 1);
    buckets.push(RangeBucket { from: None, to: Some(boundaries[0]) });
    let mut i = 1;
    while i + 2 < n {
        buckets.push(RangeBucket { from: Some(boundaries[i]), to: Some(boundaries[i + 1]) });
        i += 2;
    }
    buckets.push(RangeBucket { from: Some(boundaries[n - 1]), to: None });
    Some(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FieldPath;

    fn root_filter(path: &str) -> FilterDescriptor {
        FilterDescriptor::term(None, FieldPath::parse(path), false)
    }

    #[test]
    fn test_two_boundaries() {
        let buckets = range_buckets(&[10.0, 20.0]).unwrap();
        assert_eq!(
            buckets,
            vec![
                RangeBucket { from: None, to: Some(10.0) },
                RangeBucket { from: Some(20.0), to: None },
            ]
        );
    }

    #[test]
    fn test_interior_pairs() {
        let buckets = range_buckets(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]).unwrap();
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[1], RangeBucket { from: Some(20.0), to: Some(30.0) });
        assert_eq!(buckets[2], RangeBucket { from: Some(40.0), to: Some(50.0) });
        assert_eq!(buckets[3], RangeBucket { from: Some(60.0), to: None });
    }

    #[test]
    fn test_invalid_boundaries() {
        assert!(range_buckets(&[]).is_none());
        assert!(range_buckets(&[1.0]).is_none());
        assert!(range_buckets(&[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_terms_facet_has_missing_companion() {
        let spec = TermsFacetSpec { size: 5, all_terms: true, ..Default::default() };
        let facet = FacetDescriptor::terms(root_filter("lastname"), TermsFacetParams::from(&spec));
        let aggs = facet.aggregations(&MappingConfig::default());
        assert_eq!(aggs.len(), 2);
        match &aggs[0] {
            Aggregation::Terms { name, size, min_doc_count, .. } => {
                assert_eq!(name, "lastname");
                assert_eq!(*size, 5);
                assert_eq!(*min_doc_count, Some(0));
            }
            other => panic!("Expected Terms aggregation, got {:?}", other),
        }
        assert_eq!(aggs[1].name(), "missing_lastname");
    }

    #[test]
    fn test_nested_facet_wrapped() {
        let filter = FilterDescriptor::term(Some(FieldPath::parse("address")), FieldPath::parse("city"), false);
        let facet = FacetDescriptor::terms(filter, TermsFacetParams::from(&TermsFacetSpec::default()));
        let aggs = facet.aggregations(&MappingConfig::default());
        match &aggs[..] {
            [Aggregation::Nested { name, path, aggregations }] => {
                assert_eq!(name, "address.city_nested");
                assert_eq!(path, "address");
                assert_eq!(aggregations.len(), 2);
                assert_eq!(aggregations[0].name(), "address.city");
            }
            other => panic!("Expected one Nested aggregation, got {:?}", other),
        }
    }

    #[test]
    fn test_range_facet() {
        let filter = FilterDescriptor::range(None, FieldPath::parse("alienScore"));
        let facet = FacetDescriptor::range(filter, &[0.0, 100.0]).unwrap();
        assert_eq!(facet.name(), "alienScore");
        let aggs = facet.aggregations(&MappingConfig::default());
        assert_eq!(aggs.len(), 1);
        assert!(matches!(&aggs[0], Aggregation::Range { ranges, .. } if ranges.len() == 2));
    }
}
