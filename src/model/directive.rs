// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Member directives.
//!
//! A directive is one piece of declarative metadata attached to a field or
//! to its reader. The set is closed: the compiler and the filter/facet
//! collector match on [`Directive`] exhaustively.
//!
//! Directives serialize externally tagged in snake case, so metadata can be
//! shipped as JSON:
//!
//! ```json
//! [ "id", { "string_field": { "index": "not_analyzed" } }, { "term_filter": {} } ]
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Enumerations
// =============================================================================

/// How a string value is indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Tokenized full text.
    #[default]
    Analyzed,
    /// Indexed as a single exact token.
    NotAnalyzed,
    /// Not indexed at all.
    No,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Analyzed => "analyzed",
            IndexType::NotAnalyzed => "not_analyzed",
            IndexType::No => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermVector {
    #[default]
    No,
    Yes,
    WithOffsets,
    WithPositions,
    WithPositionsOffsets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormsLoading {
    Eager,
    Lazy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexOptions {
    Docs,
    Freqs,
    Positions,
    Offsets,
}

/// Engine numeric types accepted by [`NumberFieldSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberType {
    Float,
    Double,
    Integer,
    Long,
    Short,
    Byte,
}

impl NumberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberType::Float => "float",
            NumberType::Double => "double",
            NumberType::Integer => "integer",
            NumberType::Long => "long",
            NumberType::Short => "short",
            NumberType::Byte => "byte",
        }
    }
}

/// Ordering of terms facet buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorType {
    /// Most frequent first.
    #[default]
    Count,
    /// Least frequent first.
    ReverseCount,
    /// Term descending.
    Term,
    /// Term ascending.
    ReverseTerm,
}

// =============================================================================
// Leaf field specs
// =============================================================================

fn default_true() -> bool { true }
fn default_boost() -> f32 { 1.0 }

/// String leaf mapping. Also used for map keys and multi-field alternates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringFieldSpec {
    #[serde(default)]
    pub store: bool,
    #[serde(default)]
    pub index: IndexType,
    #[serde(default)]
    pub term_vector: TermVector,
    #[serde(default = "default_boost")]
    pub boost: f32,
    #[serde(default = "default_true")]
    pub include_in_all: bool,
    #[serde(default)]
    pub null_value: Option<String>,
    #[serde(default)]
    pub norms_enabled: Option<bool>,
    #[serde(default)]
    pub norms_loading: Option<NormsLoading>,
    #[serde(default)]
    pub index_options: Option<IndexOptions>,
    #[serde(default)]
    pub analyzer: Option<String>,
    #[serde(default)]
    pub index_analyzer: Option<String>,
    #[serde(default)]
    pub search_analyzer: Option<String>,
    #[serde(default)]
    pub ignore_above: Option<u32>,
}

impl Default for StringFieldSpec {
    fn default() -> Self {
        Self {
            store: false,
            index: IndexType::Analyzed,
            term_vector: TermVector::No,
            boost: 1.0,
            include_in_all: true,
            null_value: None,
            norms_enabled: None,
            norms_loading: None,
            index_options: None,
            analyzer: None,
            index_analyzer: None,
            search_analyzer: None,
            ignore_above: None,
        }
    }
}

impl StringFieldSpec {
    pub fn analyzed() -> Self {
        Self::default()
    }

    pub fn not_analyzed() -> Self {
        Self { index: IndexType::NotAnalyzed, ..Self::default() }
    }

    pub fn not_indexed() -> Self {
        Self { index: IndexType::No, ..Self::default() }
    }

    pub fn stored(mut self) -> Self {
        self.store = true;
        self
    }

    pub fn boosted(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn with_null_value(mut self, value: impl Into<String>) -> Self {
        self.null_value = Some(value.into());
        self
    }

    pub fn with_ignore_above(mut self, limit: u32) -> Self {
        self.ignore_above = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFieldSpec {
    #[serde(rename = "type")]
    pub number_type: NumberType,
    #[serde(default)]
    pub store: bool,
    #[serde(default = "default_true")]
    pub index: bool,
    #[serde(default = "default_boost")]
    pub boost: f32,
    #[serde(default = "default_true")]
    pub include_in_all: bool,
    #[serde(default)]
    pub ignore_malformed: bool,
}

impl NumberFieldSpec {
    pub fn new(number_type: NumberType) -> Self {
        Self {
            number_type,
            store: false,
            index: true,
            boost: 1.0,
            include_in_all: true,
            ignore_malformed: false,
        }
    }

    pub fn stored(mut self) -> Self {
        self.store = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateFieldSpec {
    #[serde(default)]
    pub store: bool,
    #[serde(default = "default_true")]
    pub index: bool,
    #[serde(default = "default_boost")]
    pub boost: f32,
    #[serde(default = "default_true")]
    pub include_in_all: bool,
    #[serde(default)]
    pub ignore_malformed: bool,
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for DateFieldSpec {
    fn default() -> Self {
        Self {
            store: false,
            index: true,
            boost: 1.0,
            include_in_all: true,
            ignore_malformed: false,
            format: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanFieldSpec {
    #[serde(default)]
    pub store: bool,
    #[serde(default = "default_true")]
    pub index: bool,
    #[serde(default = "default_boost")]
    pub boost: f32,
}

impl Default for BooleanFieldSpec {
    fn default() -> Self {
        Self { store: false, index: true, boost: 1.0 }
    }
}

/// A string leaf with alternate sub-fields (`name.raw`, `name.sort`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiFieldSpec {
    pub main: StringFieldSpec,
    #[serde(default)]
    pub alternates: Vec<AlternateField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternateField {
    pub name: String,
    #[serde(flatten)]
    pub spec: StringFieldSpec,
}

impl AlternateField {
    pub fn new(name: impl Into<String>, spec: StringFieldSpec) -> Self {
        Self { name: name.into(), spec }
    }
}

// =============================================================================
// Special slots and composites
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingSpec {
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostSpec {
    #[serde(default = "default_boost")]
    pub null_value: f32,
}

impl Default for BoostSpec {
    fn default() -> Self {
        Self { null_value: 1.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimestampSpec {
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedObjectSpec {
    /// Class compiled in place of the declared type.
    #[serde(default)]
    pub nested_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectFieldSpec {
    #[serde(default)]
    pub object_class: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ObjectFieldSpec {
    fn default() -> Self {
        Self { object_class: None, enabled: true }
    }
}

// =============================================================================
// Query metadata
// =============================================================================

fn default_paths() -> Vec<String> {
    vec![String::new()]
}

/// Exact-match filter. An empty sub-path (the default) filters on the
/// member itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermFilterSpec {
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,
    #[serde(default)]
    pub path_generator: Option<String>,
}

impl Default for TermFilterSpec {
    fn default() -> Self {
        Self { paths: default_paths(), path_generator: None }
    }
}

impl TermFilterSpec {
    pub fn on_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { paths: paths.into_iter().map(Into::into).collect(), path_generator: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub ranges: Vec<f64>,
}

fn default_facet_size() -> u32 { 10 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsFacetSpec {
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,
    #[serde(default)]
    pub path_generator: Option<String>,
    #[serde(default = "default_facet_size")]
    pub size: u32,
    #[serde(default)]
    pub order: ComparatorType,
    #[serde(default)]
    pub all_terms: bool,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for TermsFacetSpec {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            path_generator: None,
            size: default_facet_size(),
            order: ComparatorType::Count,
            all_terms: false,
            exclude: Vec::new(),
        }
    }
}

/// Named source projections; `include[i]` decides whether the member is
/// included in or excluded from `contexts[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchContextSpec {
    pub contexts: Vec<String>,
    pub include: Vec<bool>,
}

impl FetchContextSpec {
    pub fn include(context: impl Into<String>) -> Self {
        Self { contexts: vec![context.into()], include: vec![true] }
    }

    pub fn exclude(context: impl Into<String>) -> Self {
        Self { contexts: vec![context.into()], include: vec![false] }
    }

    pub fn and(mut self, context: impl Into<String>, include: bool) -> Self {
        self.contexts.push(context.into());
        self.include.push(include);
        self
    }
}

// =============================================================================
// Directive
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Id,
    Routing(RoutingSpec),
    Boost(BoostSpec),
    Timestamp(TimestampSpec),

    StringField(StringFieldSpec),
    MultiField(MultiFieldSpec),
    NumberField(NumberFieldSpec),
    DateField(DateFieldSpec),
    DateFormat(String),
    BooleanField(BooleanFieldSpec),
    IndexName(String),
    NullValue(String),
    Analyzer(String),
    IndexAnalyzer(String),
    SearchAnalyzer(String),

    NestedObject(NestedObjectSpec),
    ObjectField(ObjectFieldSpec),
    MapKeyValue(StringFieldSpec),

    TermFilter(TermFilterSpec),
    RangeFilter(RangeSpec),
    TermsFacet(TermsFacetSpec),
    RangeFacet(RangeSpec),
    FetchContext(FetchContextSpec),
}

impl Directive {
    /// Whether this directive decides the leaf type of the member.
    pub fn claims_leaf_type(&self) -> bool {
        matches!(
            self,
            Directive::StringField(_)
                | Directive::MultiField(_)
                | Directive::NumberField(_)
                | Directive::DateField(_)
                | Directive::DateFormat(_)
                | Directive::BooleanField(_)
        )
    }

    /// Whether this directive contributes anything to the property tree.
    pub fn shapes_mapping(&self) -> bool {
        self.claims_leaf_type()
            || matches!(
                self,
                Directive::IndexName(_)
                    | Directive::NullValue(_)
                    | Directive::Analyzer(_)
                    | Directive::IndexAnalyzer(_)
                    | Directive::SearchAnalyzer(_)
            )
    }
}
