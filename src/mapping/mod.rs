// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Mapping compilation.
//!
//! [`MappingCompiler`] walks a class and everything reachable from it and
//! produces a [`CompiledClass`]: the type mapping document, the settings
//! document, and the filter/facet/fetch-context metadata the query builders
//! read.
//!
//! # Mapping document
//!
//! ```text
//! {
//!   "person": {
//!     "_all":    { "enabled": true },
//!     "_source": { "enabled": true },
//!     "_type":   { "store": false, "index": "not_analyzed" },
//!     "_id":     { "path": "id" },
//!     "properties": {
//!       "lastname": { "type": "text", ... },
//!       "address":  { "type": "nested", "properties": { ... } }
//!     }
//!   }
//! }
//! ```

pub mod compiler;
pub mod fields;
pub mod property;
pub mod settings;

pub use compiler::MappingCompiler;
pub use property::{CompositeKind, CompositeMapping, LeafMapping, LeafType, PropertyNode, Properties};
pub use settings::IndexSettings;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::directive::IndexType;
use crate::search::collector::QueryMetadata;

// =============================================================================
// Special slots
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdSlot {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingSlot {
    pub path: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoostSlot {
    pub name: String,
    pub null_value: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampSlot {
    pub enabled: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllSlot {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSlot {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSlot {
    pub store: bool,
    pub index: IndexType,
}

// =============================================================================
// ClassMapping
// =============================================================================

/// Type mapping of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMapping {
    pub type_name: String,
    pub all: AllSlot,
    pub source: SourceSlot,
    pub type_slot: TypeSlot,
    pub id: Option<IdSlot>,
    pub routing: Option<RoutingSlot>,
    pub boost: Option<BoostSlot>,
    pub timestamp: Option<TimestampSlot>,
    pub properties: Properties,
}

impl ClassMapping {
    /// Property at a dotted path, descending through composites.
    pub fn property(&self, path: &str) -> Option<&PropertyNode> {
        PropertyNode::lookup(&self.properties, path)
    }
}

#[derive(Serialize)]
struct MappingBody<'a> {
    #[serde(rename = "_all")]
    all: &'a AllSlot,
    #[serde(rename = "_source")]
    source: &'a SourceSlot,
    #[serde(rename = "_type")]
    type_slot: &'a TypeSlot,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a IdSlot>,
    #[serde(rename = "_routing", skip_serializing_if = "Option::is_none")]
    routing: Option<&'a RoutingSlot>,
    #[serde(rename = "_boost", skip_serializing_if = "Option::is_none")]
    boost: Option<&'a BoostSlot>,
    #[serde(rename = "_timestamp", skip_serializing_if = "Option::is_none")]
    timestamp: Option<&'a TimestampSlot>,
    properties: &'a Properties,
}

/// Serializes as `{ "<type_name>": { ...slots, "properties": {...} } }`.
impl Serialize for ClassMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.type_name,
            &MappingBody {
                all: &self.all,
                source: &self.source,
                type_slot: &self.type_slot,
                id: self.id.as_ref(),
                routing: self.routing.as_ref(),
                boost: self.boost.as_ref(),
                timestamp: self.timestamp.as_ref(),
                properties: &self.properties,
            },
        )?;
        map.end()
    }
}

// =============================================================================
// CompiledClass
// =============================================================================

/// Everything compiled for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledClass {
    class_name: String,
    is_abstract: bool,
    mapping: ClassMapping,
    settings: IndexSettings,
    metadata: QueryMetadata,
}

impl CompiledClass {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn type_name(&self) -> &str {
        &self.mapping.type_name
    }

    /// Abstract classes keep their query metadata but are never emitted as
    /// an index type.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn mapping(&self) -> &ClassMapping {
        &self.mapping
    }

    /// The mapping for index creation; `None` for abstract classes.
    pub fn index_mapping(&self) -> Option<&ClassMapping> {
        (!self.is_abstract).then_some(&self.mapping)
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    pub fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping() -> ClassMapping {
        let mut properties = Properties::new();
        properties.insert("name".into(), PropertyNode::Leaf(LeafMapping::typed(LeafType::Keyword)));
        ClassMapping {
            type_name: "person".into(),
            all: AllSlot { enabled: true, store: None, analyzer: None },
            source: SourceSlot { enabled: true },
            type_slot: TypeSlot { store: false, index: IndexType::NotAnalyzed },
            id: Some(IdSlot { path: "id".into() }),
            routing: None,
            boost: Some(BoostSlot { name: "weight".into(), null_value: 1.0 }),
            timestamp: None,
            properties,
        }
    }

    #[test]
    fn test_document_shape() {
        assert_eq!(
            serde_json::to_value(mapping()).unwrap(),
            json!({
                "person": {
                    "_all": {"enabled": true},
                    "_source": {"enabled": true},
                    "_type": {"store": false, "index": "not_analyzed"},
                    "_id": {"path": "id"},
                    "_boost": {"name": "weight", "null_value": 1.0},
                    "properties": {"name": {"type": "keyword"}}
                }
            })
        );
    }

    #[test]
    fn test_index_mapping_hidden_for_abstract() {
        let compiled = CompiledClass {
            class_name: "a.Base".into(),
            is_abstract: true,
            mapping: mapping(),
            settings: IndexSettings::default(),
            metadata: QueryMetadata::default(),
        };
        assert!(compiled.index_mapping().is_none());
        assert_eq!(compiled.type_name(), "person");
    }
}
