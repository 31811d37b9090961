// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Property tree of a compiled mapping.
//!
//! Every entry is either a [`LeafMapping`] (a typed scalar with attributes)
//! or a [`CompositeMapping`] (an object or nested object with its own
//! properties). Serializing a [`PropertyNode`] yields the engine's mapping
//! JSON for that property:
//!
//! ```text
//! "lastname": { "type": "text", "index": true, "store": false, "boost": 1.0 }
//! "address":  { "type": "nested", "properties": { "city": { ... } } }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::directive::{IndexOptions, NormsLoading, NumberType, TermVector};

/// Properties keyed by member name, in declaration order.
pub type Properties = IndexMap<String, PropertyNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafType {
    Text,
    Keyword,
    Float,
    Double,
    Integer,
    Long,
    Short,
    Byte,
    Date,
    Boolean,
}

impl LeafType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeafType::Text => "text",
            LeafType::Keyword => "keyword",
            LeafType::Float => "float",
            LeafType::Double => "double",
            LeafType::Integer => "integer",
            LeafType::Long => "long",
            LeafType::Short => "short",
            LeafType::Byte => "byte",
            LeafType::Date => "date",
            LeafType::Boolean => "boolean",
        }
    }
}

impl From<NumberType> for LeafType {
    fn from(number: NumberType) -> Self {
        match number {
            NumberType::Float => LeafType::Float,
            NumberType::Double => LeafType::Double,
            NumberType::Integer => LeafType::Integer,
            NumberType::Long => LeafType::Long,
            NumberType::Short => LeafType::Short,
            NumberType::Byte => LeafType::Byte,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Norms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<NormsLoading>,
}

/// A scalar property. `field_type` is `None` only when attribute
/// directives (index name, analyzers, ...) were given without a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeafMapping {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<LeafType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_in_all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_vector: Option<TermVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norms: Option<Norms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_options: Option<IndexOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_above: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_malformed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fielddata: Option<bool>,
    /// Multi-field alternates.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, LeafMapping>,
}

impl LeafMapping {
    pub fn typed(field_type: LeafType) -> Self {
        Self { field_type: Some(field_type), ..Self::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    Object,
    Nested,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeMapping {
    #[serde(rename = "type")]
    pub kind: CompositeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: Properties,
}

impl CompositeMapping {
    pub fn object() -> Self {
        Self { kind: CompositeKind::Object, enabled: None, properties: Properties::new() }
    }

    pub fn nested() -> Self {
        Self { kind: CompositeKind::Nested, enabled: None, properties: Properties::new() }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyNode {
    Leaf(LeafMapping),
    Composite(CompositeMapping),
}

impl PropertyNode {
    pub fn as_leaf(&self) -> Option<&LeafMapping> {
        match self {
            PropertyNode::Leaf(leaf) => Some(leaf),
            PropertyNode::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeMapping> {
        match self {
            PropertyNode::Composite(composite) => Some(composite),
            PropertyNode::Leaf(_) => None,
        }
    }

    /// Follow a dotted path through composite properties.
    pub fn lookup<'a>(properties: &'a Properties, path: &str) -> Option<&'a PropertyNode> {
        let mut segments = path.split('.');
        let mut node = properties.get(segments.next()?)?;
        for segment in segments {
            node = node.as_composite()?.properties.get(segment)?;
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_serializes_only_set_attributes() {
        let mut leaf = LeafMapping::typed(LeafType::Keyword);
        leaf.index = Some(true);
        leaf.null_value = Some("n/a".into());
        assert_eq!(
            serde_json::to_value(&leaf).unwrap(),
            json!({"type": "keyword", "index": true, "null_value": "n/a"})
        );
    }

    #[test]
    fn test_untyped_leaf_has_no_type_key() {
        let leaf = LeafMapping { index_name: Some("alias".into()), ..Default::default() };
        assert_eq!(serde_json::to_value(&leaf).unwrap(), json!({"index_name": "alias"}));
    }

    #[test]
    fn test_composite_shapes() {
        let mut nested = CompositeMapping::nested();
        nested
            .properties
            .insert("city".into(), PropertyNode::Leaf(LeafMapping::typed(LeafType::Keyword)));
        assert_eq!(
            serde_json::to_value(PropertyNode::Composite(nested)).unwrap(),
            json!({"type": "nested", "properties": {"city": {"type": "keyword"}}})
        );

        let disabled = CompositeMapping::object().with_enabled(false);
        assert_eq!(
            serde_json::to_value(PropertyNode::Composite(disabled)).unwrap(),
            json!({"type": "object", "enabled": false})
        );
    }

    #[test]
    fn test_properties_keep_insertion_order() {
        let mut props = Properties::new();
        props.insert("zeta".into(), PropertyNode::Leaf(LeafMapping::typed(LeafType::Long)));
        props.insert("alpha".into(), PropertyNode::Leaf(LeafMapping::typed(LeafType::Long)));
        let json = serde_json::to_string(&props).unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
    }

    #[test]
    fn test_lookup_through_composites() {
        let mut address = CompositeMapping::nested();
        address
            .properties
            .insert("city".into(), PropertyNode::Leaf(LeafMapping::typed(LeafType::Keyword)));
        let mut props = Properties::new();
        props.insert("address".into(), PropertyNode::Composite(address));

        let city = PropertyNode::lookup(&props, "address.city").unwrap();
        assert_eq!(city.as_leaf().unwrap().field_type, Some(LeafType::Keyword));
        assert!(PropertyNode::lookup(&props, "address.zip").is_none());
        assert!(PropertyNode::lookup(&props, "address.city.x").is_none());
    }

    #[test]
    fn test_number_type_conversion() {
        assert_eq!(LeafType::from(NumberType::Integer).as_str(), "integer");
        assert_eq!(LeafType::from(NumberType::Byte), LeafType::Byte);
    }
}
