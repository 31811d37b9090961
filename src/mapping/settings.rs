// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index settings document.
//!
//! Kept apart from the mapping document: the catch-all default field and
//! custom analyzer definitions.
//!
//! ```text
//! {
//!   "index":    { "query": { "default_field": "_all" } },
//!   "analysis": { "analyzer": { "folding": { "type": "custom", "tokenizer": "standard", "filter": ["lowercase"] } } }
//! }
//! ```

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::MappingConfig;
use crate::model::{AnalyzerDefinition, ClassDef};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSettings {
    default_field: Option<String>,
    analyzers: IndexMap<String, AnalyzerDefinition>,
}

impl IndexSettings {
    pub fn from_class(class: &ClassDef, config: &MappingConfig) -> Self {
        let catch_all = class
            .directives
            .document
            .as_ref()
            .map_or(true, |document| document.all);

        Self {
            default_field: catch_all.then(|| config.catch_all_field.clone()),
            analyzers: class
                .directives
                .analyzers
                .iter()
                .map(|analyzer| (analyzer.name.clone(), analyzer.clone()))
                .collect(),
        }
    }

    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    pub fn analyzer(&self, name: &str) -> Option<&AnalyzerDefinition> {
        self.analyzers.get(name)
    }

    pub fn analyzers(&self) -> impl Iterator<Item = &AnalyzerDefinition> {
        self.analyzers.values()
    }

    pub fn is_empty(&self) -> bool {
        self.default_field.is_none() && self.analyzers.is_empty()
    }
}

#[derive(Serialize)]
struct QuerySection<'a> {
    default_field: &'a str,
}

#[derive(Serialize)]
struct IndexSection<'a> {
    query: QuerySection<'a>,
}

#[derive(Serialize)]
struct AnalyzerBody<'a> {
    #[serde(rename = "type")]
    analyzer_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokenizer: Option<&'a str>,
    #[serde(rename = "filter", skip_serializing_if = "no_items")]
    filters: &'a [String],
    #[serde(rename = "char_filter", skip_serializing_if = "no_items")]
    char_filters: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    stopwords: &'a [String],
}

fn no_items(items: &&[String]) -> bool {
    items.is_empty()
}

struct Analyzers<'a>(&'a IndexMap<String, AnalyzerDefinition>);

impl Serialize for Analyzers<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, def) in self.0 {
            map.serialize_entry(
                name,
                &AnalyzerBody {
                    analyzer_type: &def.analyzer_type,
                    tokenizer: def.tokenizer.as_deref(),
                    filters: &def.filters,
                    char_filters: &def.char_filters,
                    stopwords: &def.stopwords,
                },
            )?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct AnalysisSection<'a> {
    analyzer: Analyzers<'a>,
}

impl Serialize for IndexSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(field) = &self.default_field {
            map.serialize_entry(
                "index",
                &IndexSection { query: QuerySection { default_field: field } },
            )?;
        }
        if !self.analyzers.is_empty() {
            map.serialize_entry("analysis", &AnalysisSection { analyzer: Analyzers(&self.analyzers) })?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentSettings;
    use serde_json::json;

    #[test]
    fn test_catch_all_enabled_by_default() {
        let class = ClassDef::new("a.A").document(DocumentSettings::default());
        let settings = IndexSettings::from_class(&class, &MappingConfig::default());
        assert_eq!(settings.default_field(), Some("_all"));
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"index": {"query": {"default_field": "_all"}}})
        );
    }

    #[test]
    fn test_catch_all_disabled() {
        let class = ClassDef::new("a.A").document(DocumentSettings { all: false, ..Default::default() });
        let settings = IndexSettings::from_class(&class, &MappingConfig::default());
        assert!(settings.is_empty());
        assert_eq!(serde_json::to_value(&settings).unwrap(), json!({}));
    }

    #[test]
    fn test_analyzer_definitions() {
        let class = ClassDef::new("a.A")
            .document(DocumentSettings { all: false, ..Default::default() })
            .analyzer(
                AnalyzerDefinition::custom("folding", "standard")
                    .filter("lowercase")
                    .filter("asciifolding")
                    .char_filter("html_strip"),
            )
            .analyzer(AnalyzerDefinition {
                name: "english_stop".into(),
                analyzer_type: "stop".into(),
                tokenizer: None,
                filters: Vec::new(),
                char_filters: Vec::new(),
                stopwords: vec!["the".into(), "a".into()],
            });
        let settings = IndexSettings::from_class(&class, &MappingConfig::default());
        assert_eq!(settings.analyzers().count(), 2);
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({
                "analysis": {
                    "analyzer": {
                        "folding": {
                            "type": "custom",
                            "tokenizer": "standard",
                            "filter": ["lowercase", "asciifolding"],
                            "char_filter": ["html_strip"]
                        },
                        "english_stop": {
                            "type": "stop",
                            "stopwords": ["the", "a"]
                        }
                    }
                }
            })
        );
    }
}
