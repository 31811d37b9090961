// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter, facet and fetch-context collection.
//!
//! The compiler hands every member it visits to a [`FilterFacetCollector`]
//! together with the member's document path and the nested root it sits
//! under. The collector turns query directives into descriptors and keeps
//! one registration per resolved field: a facet replaces a plain filter on
//! the same field, and a later registration replaces an earlier one of the
//! same kind.

use indexmap::IndexMap;
use tracing::warn;

use super::facet::{FacetDescriptor, TermsFacetParams};
use super::fetch::SourceFetchContext;
use super::filter::FilterDescriptor;
use crate::catalog::ClassCatalog;
use crate::error::MappingError;
use crate::introspect::IndexableMember;
use crate::metrics;
use crate::model::directive::IndexType;
use crate::path::FieldPath;

/// Query-time metadata of one compiled class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMetadata {
    filters: Vec<FilterDescriptor>,
    facets: Vec<FacetDescriptor>,
    fetch_contexts: IndexMap<String, SourceFetchContext>,
}

impl QueryMetadata {
    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    pub fn facets(&self) -> &[FacetDescriptor] {
        &self.facets
    }

    /// Filter registered for a full document path.
    pub fn filter(&self, es_field_name: &str) -> Option<&FilterDescriptor> {
        self.filters.iter().find(|f| f.es_field_name() == es_field_name)
    }

    pub fn fetch_context(&self, name: &str) -> Option<&SourceFetchContext> {
        self.fetch_contexts.get(name)
    }

    fn register_filter(&mut self, filter: FilterDescriptor) {
        let name = filter.es_field_name();
        if self.facets.iter().any(|f| f.name() == name) {
            warn!(field = %name, "Field already registered as a facet, filter ignored");
            metrics::record_override("filter_after_facet");
            return;
        }
        match self.filters.iter().position(|f| f.es_field_name() == name) {
            Some(pos) => {
                warn!(field = %name, "Filter redefined, later one wins");
                metrics::record_override("filter_redefined");
                self.filters[pos] = filter;
            }
            None => self.filters.push(filter),
        }
    }

    fn register_facet(&mut self, facet: FacetDescriptor) {
        let name = facet.name();
        match self.filters.iter().position(|f| f.es_field_name() == name) {
            Some(pos) => {
                if !self.facets.iter().any(|f| f.name() == name) {
                    warn!(field = %name, "Filter replaced by facet on the same field");
                    metrics::record_override("filter_replaced_by_facet");
                }
                self.filters[pos] = facet.filter().clone();
            }
            None => self.filters.push(facet.filter().clone()),
        }
        match self.facets.iter().position(|f| f.name() == name) {
            Some(pos) => {
                warn!(field = %name, "Facet redefined, later one wins");
                metrics::record_override("facet_redefined");
                self.facets[pos] = facet;
            }
            None => self.facets.push(facet),
        }
    }

    fn register_fetch_path(&mut self, context: &str, path: &FieldPath, include: bool) {
        self.fetch_contexts
            .entry(context.to_string())
            .or_default()
            .add(path.to_string(), include);
    }
}

pub struct FilterFacetCollector<'a> {
    catalog: &'a ClassCatalog,
    class: String,
    metadata: QueryMetadata,
}

impl<'a> FilterFacetCollector<'a> {
    /// `class` is the class being compiled; nested members register on it.
    pub fn new(catalog: &'a ClassCatalog, class: impl Into<String>) -> Self {
        Self {
            catalog,
            class: class.into(),
            metadata: QueryMetadata::default(),
        }
    }

    /// Register the query directives of one member.
    ///
    /// `path` is the member's full document path and `nested_root` the
    /// nearest enclosing nested object, if any.
    pub fn collect(
        &mut self,
        member: &IndexableMember,
        path: &FieldPath,
        nested_root: Option<&FieldPath>,
    ) -> Result<(), MappingError> {
        self.collect_fetch_contexts(member, path)?;

        let (nested_path, base) = Self::resolve_base(member, path, nested_root);
        let analyzed = member
            .string_spec()
            .map_or(true, |spec| spec.index == IndexType::Analyzed);

        if let Some(spec) = member.term_filter() {
            for sub in self.expand_paths(member, &spec.paths, spec.path_generator.as_deref())? {
                let filter = FilterDescriptor::term(nested_path.clone(), base.child(&sub), analyzed);
                self.metadata.register_filter(filter);
            }
            for (alternate, alt_analyzed) in Self::alternates(member) {
                let filter = FilterDescriptor::term(nested_path.clone(), base.child(&alternate), alt_analyzed);
                self.metadata.register_filter(filter);
            }
        }

        if let Some(spec) = member.range_filter() {
            self.validate_ranges(member, &spec.ranges)?;
            self.metadata
                .register_filter(FilterDescriptor::range(nested_path.clone(), base.clone()));
        }

        if let Some(spec) = member.terms_facet() {
            let params = TermsFacetParams::from(spec);
            for sub in self.expand_paths(member, &spec.paths, spec.path_generator.as_deref())? {
                let filter = FilterDescriptor::term(nested_path.clone(), base.child(&sub), analyzed);
                self.metadata
                    .register_facet(FacetDescriptor::terms(filter, params.clone()));
            }
            for (alternate, alt_analyzed) in Self::alternates(member) {
                let filter = FilterDescriptor::term(nested_path.clone(), base.child(&alternate), alt_analyzed);
                self.metadata
                    .register_facet(FacetDescriptor::terms(filter, params.clone()));
            }
        }

        if let Some(spec) = member.range_facet() {
            let filter = FilterDescriptor::range(nested_path.clone(), base.clone());
            let facet = FacetDescriptor::range(filter, &spec.ranges)
                .ok_or_else(|| self.invalid_ranges(member, spec.ranges.len()))?;
            self.metadata.register_facet(facet);
        }

        Ok(())
    }

    pub fn finish(self) -> QueryMetadata {
        self.metadata
    }

    /// Nested root and base path (relative to that root) for the member's
    /// descriptors. A nested-object member is itself the root of the
    /// sub-paths declared on it.
    fn resolve_base(
        member: &IndexableMember,
        path: &FieldPath,
        nested_root: Option<&FieldPath>,
    ) -> (Option<FieldPath>, FieldPath) {
        if member.nested_object().is_some() {
            return (Some(path.clone()), FieldPath::root());
        }
        match nested_root {
            Some(root) => {
                let relative = path.strip_prefix(root).unwrap_or_else(|| path.clone());
                (Some(root.clone()), relative)
            }
            None => (None, path.clone()),
        }
    }

    fn alternates(member: &IndexableMember) -> Vec<(String, bool)> {
        member
            .multi_field()
            .map(|multi| {
                multi
                    .alternates
                    .iter()
                    .map(|alt| (alt.name.clone(), alt.spec.index == IndexType::Analyzed))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn expand_paths(
        &self,
        member: &IndexableMember,
        declared: &[String],
        generator: Option<&str>,
    ) -> Result<Vec<String>, MappingError> {
        match generator {
            None => Ok(declared.to_vec()),
            Some(name) => {
                let generator = self.catalog.path_generator(name).ok_or_else(|| {
                    MappingError::UnknownPathGenerator {
                        class: self.class.clone(),
                        member: member.name().to_string(),
                        generator: name.to_string(),
                    }
                })?;
                Ok(generator.paths(declared))
            }
        }
    }

    fn validate_ranges(&self, member: &IndexableMember, ranges: &[f64]) -> Result<(), MappingError> {
        if ranges.len() < 2 || ranges.len() % 2 != 0 {
            return Err(self.invalid_ranges(member, ranges.len()));
        }
        Ok(())
    }

    fn invalid_ranges(&self, member: &IndexableMember, count: usize) -> MappingError {
        MappingError::InvalidRanges {
            class: self.class.clone(),
            member: member.name().to_string(),
            count,
        }
    }

    fn collect_fetch_contexts(&mut self, member: &IndexableMember, path: &FieldPath) -> Result<(), MappingError> {
        let Some(spec) = member.fetch_context() else {
            return Ok(());
        };
        if spec.contexts.len() != spec.include.len() {
            return Err(MappingError::FetchContextMismatch {
                class: self.class.clone(),
                member: member.name().to_string(),
                contexts: spec.contexts.len(),
                flags: spec.include.len(),
            });
        }
        for (context, include) in spec.contexts.iter().zip(&spec.include) {
            self.metadata.register_fetch_path(context, path, *include);
        }
        Ok(())
    }
}
