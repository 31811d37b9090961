//! Configuration for mapping compilation and query assembly.
//!
//! # Example
//!
//! ```
//! use es_mapping::MappingConfig;
//!
//! // Defaults
//! let config = MappingConfig::default();
//! assert_eq!(config.catch_all_field, "_all");
//! assert_eq!(config.prefix_max_expansions, 10);
//!
//! // Override a few fields
//! let config = MappingConfig {
//!     catch_all_field: "all_text".into(),
//!     prefix_max_expansions: 50,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration shared by the compiler and the query builders.
///
/// Every field has a default, so an empty JSON object deserializes to
/// [`MappingConfig::default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MappingConfig {
    /// Field searched by free-text seeds and advertised as the default
    /// field in the settings document.
    #[serde(default = "default_catch_all_field")]
    pub catch_all_field: String,

    /// `max_expansions` of the phrase-prefix seed query.
    #[serde(default = "default_prefix_max_expansions")]
    pub prefix_max_expansions: u32,

    /// Name prefix of the companion aggregation counting documents
    /// without a value for a terms facet.
    #[serde(default = "default_missing_bucket_prefix")]
    pub missing_bucket_prefix: String,

    /// Type assumed by explicit field sorts when an index lacks the field.
    #[serde(default = "default_unmapped_sort_type")]
    pub unmapped_sort_type: String,

    /// Suffix of the wrapper aggregation emitted for facets under a nested root.
    #[serde(default = "default_nested_aggregation_suffix")]
    pub nested_aggregation_suffix: String,
}

fn default_catch_all_field() -> String { "_all".to_string() }
fn default_prefix_max_expansions() -> u32 { 10 }
fn default_missing_bucket_prefix() -> String { "missing_".to_string() }
fn default_unmapped_sort_type() -> String { "keyword".to_string() }
fn default_nested_aggregation_suffix() -> String { "_nested".to_string() }

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            catch_all_field: default_catch_all_field(),
            prefix_max_expansions: default_prefix_max_expansions(),
            missing_bucket_prefix: default_missing_bucket_prefix(),
            unmapped_sort_type: default_unmapped_sort_type(),
            nested_aggregation_suffix: default_nested_aggregation_suffix(),
        }
    }
}
