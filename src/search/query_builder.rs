// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Builders - search and count requests over compiled classes
//!
//! Both builders read the filter and facet registrations of their target
//! classes from a [`MappingRegistry`] and never mutate it.
//!
//! # Composition
//!
//! ```text
//! seed (match_all | phrase prefix on catch-all | prefix on one field)
//!   └─ adapter (optional)
//!        └─ bool.must
//!             ├─ seed
//!             ├─ root filter fragments
//!             ├─ nested { path, bool.must [fragments under path] }   (one per path)
//!             └─ custom filter (optional)
//!   └─ function_score (optional)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # use es_mapping::{MappingRegistry, SearchQueryBuilder};
//! # fn example(registry: &MappingRegistry) -> Result<(), es_mapping::QueryError> {
//! let request = SearchQueryBuilder::new(registry)
//!     .index("people")
//!     .class("app.model.Person")
//!     .text("jo")
//!     .filter("address.city", vec!["Paris".to_string()])
//!     .with_facets()
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::dsl::{Aggregation, CountRequest, QueryNode, SearchRequest, SortClause, SortOrder};
use super::facet::FacetDescriptor;
use super::fetch::SourceFetchContext;
use crate::error::QueryError;
use crate::mapping::CompiledClass;
use crate::metrics;
use crate::registry::MappingRegistry;

/// How several values supplied for one field combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterStrategy {
    /// Any value matches: one multi-value fragment.
    #[default]
    Or,
    /// Every value must match: one fragment per value.
    And,
}

/// Rewrites the seed query before filters are composed around it.
pub trait QueryAdapter: Send + Sync {
    fn adapt(&self, seed: QueryNode) -> QueryNode;
}

impl<F> QueryAdapter for F
where
    F: Fn(QueryNode) -> QueryNode + Send + Sync,
{
    fn adapt(&self, seed: QueryNode) -> QueryNode {
        self(seed)
    }
}

/// Seed and filter composition shared by both builders.
#[derive(Clone, Default)]
struct QueryParts {
    indices: Vec<String>,
    classes: Vec<String>,
    text: Option<String>,
    prefix_field: Option<String>,
    filters: IndexMap<String, Vec<String>>,
    strategies: HashMap<String, FilterStrategy>,
    custom_filter: Option<QueryNode>,
    adapter: Option<Arc<dyn QueryAdapter>>,
}

impl QueryParts {
    fn compiled(&self, registry: &MappingRegistry) -> Result<Vec<Arc<CompiledClass>>, QueryError> {
        self.classes
            .iter()
            .map(|class| registry.compiled(class).map_err(QueryError::from))
            .collect()
    }

    /// Type names of the concrete target classes.
    fn types(compiled: &[Arc<CompiledClass>]) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for class in compiled.iter().filter(|c| !c.is_abstract()) {
            if !types.iter().any(|t| t == class.type_name()) {
                types.push(class.type_name().to_string());
            }
        }
        types
    }

    /// Non-blank seed text.
    fn seed_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }

    fn prefix_active(&self) -> Option<&str> {
        self.seed_text().and(self.prefix_field.as_deref())
    }

    fn seed(&self, registry: &MappingRegistry, compiled: &[Arc<CompiledClass>]) -> QueryNode {
        let Some(text) = self.seed_text() else {
            return QueryNode::match_all();
        };
        let config = registry.config();
        match &self.prefix_field {
            None => QueryNode::phrase_prefix(&config.catch_all_field, text, config.prefix_max_expansions),
            Some(field) => {
                let prefix = QueryNode::prefix(field, text);
                let nested_path = compiled
                    .iter()
                    .find_map(|class| class.metadata().filter(field))
                    .and_then(|filter| filter.nested_path().cloned());
                match nested_path {
                    Some(path) => QueryNode::nested(path.to_string(), prefix),
                    None => prefix,
                }
            }
        }
    }

    fn compose(&self, registry: &MappingRegistry, compiled: &[Arc<CompiledClass>]) -> Result<QueryNode, QueryError> {
        let mut seed = self.seed(registry, compiled);
        if let Some(adapter) = &self.adapter {
            seed = adapter.adapt(seed);
        }

        let mut must = vec![seed];
        let mut nested: IndexMap<String, Vec<QueryNode>> = IndexMap::new();
        let mut applied: HashSet<String> = HashSet::new();

        for filter in compiled.iter().flat_map(|class| class.metadata().filters()) {
            let field = filter.es_field_name();
            let Some(values) = self.filters.get(&field) else {
                continue;
            };
            if !applied.insert(field.clone()) {
                continue;
            }
            let fragments = match self.strategies.get(&field).copied().unwrap_or_default() {
                FilterStrategy::Or => vec![filter.build(values)?],
                FilterStrategy::And => filter.build_each(values)?,
            };
            match filter.nested_path() {
                Some(path) => nested.entry(path.to_string()).or_default().extend(fragments),
                None => must.extend(fragments),
            }
        }

        for field in self.filters.keys().filter(|field| !applied.contains(*field)) {
            debug!(field = %field, "No filter registered for field, values ignored");
        }

        for (path, fragments) in nested {
            must.push(QueryNode::nested(path, QueryNode::all_of(fragments)));
        }
        if let Some(custom) = &self.custom_filter {
            must.push(custom.clone());
        }
        Ok(QueryNode::all_of(must))
    }
}

/// Builder methods both request kinds share.
macro_rules! query_parts_methods {
    () => {
        /// Add a target index.
        pub fn index(mut self, index: impl Into<String>) -> Self {
            self.parts.indices.push(index.into());
            self
        }

        pub fn indices<I, S>(mut self, indices: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.parts.indices.extend(indices.into_iter().map(Into::into));
            self
        }

        /// Add a target class by name.
        pub fn class(mut self, class: impl Into<String>) -> Self {
            self.parts.classes.push(class.into());
            self
        }

        pub fn classes<I, S>(mut self, classes: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.parts.classes.extend(classes.into_iter().map(Into::into));
            self
        }

        /// Seed text. Blank text matches every document.
        pub fn text(mut self, text: impl Into<String>) -> Self {
            self.parts.text = Some(text.into());
            self
        }

        /// Match the seed text as a prefix of this field instead of the
        /// catch-all field.
        pub fn prefix_field(mut self, field: impl Into<String>) -> Self {
            self.parts.prefix_field = Some(field.into());
            self
        }

        /// Values for a filter, keyed by full document path.
        pub fn filter(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
            self.parts.filters.insert(field.into(), values);
            self
        }

        pub fn filters<I, S>(mut self, filters: I) -> Self
        where
            I: IntoIterator<Item = (S, Vec<String>)>,
            S: Into<String>,
        {
            self.parts
                .filters
                .extend(filters.into_iter().map(|(field, values)| (field.into(), values)));
            self
        }

        pub fn strategy(mut self, field: impl Into<String>, strategy: FilterStrategy) -> Self {
            self.parts.strategies.insert(field.into(), strategy);
            self
        }

        /// Extra fragment appended as a `must` clause.
        pub fn custom_filter(mut self, filter: QueryNode) -> Self {
            self.parts.custom_filter = Some(filter);
            self
        }

        pub fn adapter(mut self, adapter: Arc<dyn QueryAdapter>) -> Self {
            self.parts.adapter = Some(adapter);
            self
        }
    };
}

/// Builds search requests: query, aggregations, sort and source projection.
pub struct SearchQueryBuilder<'r> {
    registry: &'r MappingRegistry,
    parts: QueryParts,
    fetch_context: Option<String>,
    facets: bool,
    extra_facets: Vec<FacetDescriptor>,
    sort: Option<(String, SortOrder)>,
    function_score: Option<String>,
}

impl<'r> SearchQueryBuilder<'r> {
    pub fn new(registry: &'r MappingRegistry) -> Self {
        Self {
            registry,
            parts: QueryParts::default(),
            fetch_context: None,
            facets: false,
            extra_facets: Vec::new(),
            sort: None,
            function_score: None,
        }
    }

    query_parts_methods!();

    /// Project the source through a named fetch context.
    pub fn fetch_context(mut self, context: impl Into<String>) -> Self {
        self.fetch_context = Some(context.into());
        self
    }

    /// Emit the target classes' registered facets as aggregations.
    pub fn with_facets(mut self) -> Self {
        self.facets = true;
        self
    }

    /// Facet emitted even if no target class registered it. Wins over a
    /// registered facet of the same name.
    pub fn facet(mut self, facet: FacetDescriptor) -> Self {
        self.facets = true;
        self.extra_facets.push(facet);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    /// Score documents with a script.
    pub fn function_score(mut self, script: impl Into<String>) -> Self {
        self.function_score = Some(script.into());
        self
    }

    pub fn build(self) -> Result<SearchRequest, QueryError> {
        let compiled = self.parts.compiled(self.registry)?;
        let mut query = self.parts.compose(self.registry, &compiled)?;
        if let Some(script) = &self.function_score {
            query = QueryNode::function_score(query, script);
        }

        let request = SearchRequest {
            indices: self.parts.indices.clone(),
            types: QueryParts::types(&compiled),
            query,
            aggregations: self.aggregations(&compiled),
            sort: self.sort_clauses(),
            source: self.source(&compiled)?,
        };
        metrics::record_query_assembled("search");
        debug!(endpoint = %request.endpoint(), aggregations = request.aggregations.len(), "Search request assembled");
        Ok(request)
    }

    fn aggregations(&self, compiled: &[Arc<CompiledClass>]) -> Vec<Aggregation> {
        if !self.facets {
            return Vec::new();
        }
        let mut by_name: IndexMap<String, &FacetDescriptor> = IndexMap::new();
        let registered = compiled.iter().flat_map(|class| class.metadata().facets());
        for facet in self.extra_facets.iter().chain(registered) {
            by_name.entry(facet.name()).or_insert(facet);
        }

        let config = self.registry.config();
        by_name
            .into_iter()
            .filter(|(name, _)| !self.parts.filters.contains_key(name))
            .flat_map(|(_, facet)| facet.aggregations(config))
            .collect()
    }

    fn sort_clauses(&self) -> Vec<SortClause> {
        let unmapped_type = self.registry.config().unmapped_sort_type.clone();
        if let Some((field, order)) = &self.sort {
            return vec![SortClause::Field { field: field.clone(), order: *order, unmapped_type }];
        }
        match self.parts.prefix_active() {
            Some(field) => vec![SortClause::Field {
                field: field.to_string(),
                order: SortOrder::Asc,
                unmapped_type,
            }],
            None => vec![SortClause::Score],
        }
    }

    fn source(&self, compiled: &[Arc<CompiledClass>]) -> Result<Option<SourceFetchContext>, QueryError> {
        let Some(context) = &self.fetch_context else {
            return Ok(None);
        };
        let mut declared = Vec::with_capacity(compiled.len());
        for class in compiled {
            declared.push(self.registry.fetch_context(class.class_name(), context)?);
        }
        Ok(merge_fetch_contexts(declared))
    }
}

/// Union of the projections found per class. `None` only when no class
/// declared the context; a declared but empty projection stays `Some`.
fn merge_fetch_contexts<I>(found: I) -> Option<SourceFetchContext>
where
    I: IntoIterator<Item = Option<SourceFetchContext>>,
{
    found.into_iter().flatten().reduce(|mut merged, next| {
        merged.merge(&next);
        merged
    })
}

/// Builds count requests with the same seed and filter composition as
/// [`SearchQueryBuilder`].
pub struct CountQueryBuilder<'r> {
    registry: &'r MappingRegistry,
    parts: QueryParts,
}

impl<'r> CountQueryBuilder<'r> {
    pub fn new(registry: &'r MappingRegistry) -> Self {
        Self { registry, parts: QueryParts::default() }
    }

    query_parts_methods!();

    pub fn build(self) -> Result<CountRequest, QueryError> {
        let compiled = self.parts.compiled(self.registry)?;
        let request = CountRequest {
            indices: self.parts.indices.clone(),
            types: QueryParts::types(&compiled),
            query: self.parts.compose(self.registry, &compiled)?,
        };
        metrics::record_query_assembled("count");
        debug!(endpoint = %request.endpoint(), "Count request assembled");
        Ok(request)
    }
}
