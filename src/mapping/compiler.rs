// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The mapping compiler.
//!
//! Members are visited superclass first. Each member is classified by its
//! declared type:
//!
//! ```text
//! primitive / string / date      -> leaf (directive driven)
//! enum                           -> leaf when a string directive is present
//! array / collection of scalars  -> leaf of the element type
//! map + key/value directive      -> object { key, value }
//! anything else                  -> object or nested object, recursing
//! ```
//!
//! Special slots (`_id`, `_routing`, `_boost`, `_timestamp`) are only taken
//! from root-level members; the first declaration wins.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::fields::{apply_leaf_directives, inferred_leaf, map_key_leaf};
use super::property::{CompositeKind, CompositeMapping, LeafMapping, Properties, PropertyNode};
use super::settings::IndexSettings;
use super::{AllSlot, BoostSlot, ClassMapping, CompiledClass, IdSlot, RoutingSlot, SourceSlot, TimestampSlot, TypeSlot};
use crate::catalog::ClassCatalog;
use crate::config::MappingConfig;
use crate::error::MappingError;
use crate::introspect::{IndexableMember, TypeIntrospector};
use crate::metrics::{self, LatencyTimer};
use crate::model::directive::StringFieldSpec;
use crate::model::{ClassDef, Directive, TypeRef};
use crate::path::FieldPath;
use crate::search::collector::FilterFacetCollector;

pub struct MappingCompiler<'a> {
    catalog: &'a ClassCatalog,
    config: &'a MappingConfig,
}

/// Where the members currently being compiled sit in the document.
#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: FieldPath,
    nested_root: Option<FieldPath>,
}

impl Scope {
    fn is_root(&self) -> bool {
        self.prefix.is_root()
    }
}

#[derive(Debug, Default)]
struct SpecialSlots {
    id: Option<IdSlot>,
    routing: Option<RoutingSlot>,
    boost: Option<BoostSlot>,
    timestamp: Option<TimestampSlot>,
}

impl SpecialSlots {
    fn collect(&mut self, member: &IndexableMember, class: &str) {
        let name = member.name().to_string();
        if member.is_id() {
            set_once(&mut self.id, IdSlot { path: name.clone() }, "_id", class, member);
        }
        if let Some(spec) = member.routing() {
            let slot = RoutingSlot { path: name.clone(), required: spec.required };
            set_once(&mut self.routing, slot, "_routing", class, member);
        }
        if let Some(spec) = member.boost() {
            let slot = BoostSlot { name: name.clone(), null_value: spec.null_value };
            set_once(&mut self.boost, slot, "_boost", class, member);
        }
        if let Some(spec) = member.timestamp() {
            let slot = TimestampSlot { enabled: true, path: name, format: spec.format.clone() };
            set_once(&mut self.timestamp, slot, "_timestamp", class, member);
        }
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, slot_name: &str, class: &str, member: &IndexableMember) {
    if slot.is_some() {
        warn!(
            class = %class,
            slot = slot_name,
            field = %member.name(),
            "Special slot already defined, keeping the first declaration"
        );
        metrics::record_override("duplicate_slot");
    } else {
        *slot = Some(value);
    }
}

struct CompileState<'a> {
    class: String,
    slots: SpecialSlots,
    collector: FilterFacetCollector<'a>,
    /// Classes on the current expansion path.
    expanding: Vec<String>,
}

impl<'a> MappingCompiler<'a> {
    pub fn new(catalog: &'a ClassCatalog, config: &'a MappingConfig) -> Self {
        Self { catalog, config }
    }

    /// Type name of a class: the explicit one, else its lowercased simple name.
    pub fn type_name(class: &ClassDef) -> String {
        class
            .directives
            .type_name
            .clone()
            .unwrap_or_else(|| class.simple_name().to_lowercase())
    }

    /// Compile a class. Nothing is returned on error; the caller publishes
    /// only complete results.
    pub fn compile(&self, class_name: &str) -> Result<CompiledClass, MappingError> {
        let _timer = LatencyTimer::new(class_name);
        match self.compile_class(class_name) {
            Ok(compiled) => {
                metrics::record_class_compiled(class_name);
                Ok(compiled)
            }
            Err(e) => {
                warn!(class = %class_name, error = %e, "Class mapping compilation failed");
                metrics::record_compile_failure(class_name);
                Err(e)
            }
        }
    }

    fn compile_class(&self, class_name: &str) -> Result<CompiledClass, MappingError> {
        let class = self
            .catalog
            .get(class_name)
            .ok_or_else(|| MappingError::UnknownClass(class_name.to_string()))?;

        let mut state = CompileState {
            class: class.name.clone(),
            slots: SpecialSlots::default(),
            collector: FilterFacetCollector::new(self.catalog, class.name.clone()),
            expanding: Vec::new(),
        };
        let mut properties = Properties::new();
        self.compile_members(&class, &mut properties, &Scope::default(), &mut state)?;

        let mapping = self.class_mapping(&class, properties, state.slots);
        let settings = IndexSettings::from_class(&class, self.config);
        let metadata = state.collector.finish();

        info!(
            class = %class.name,
            type_name = %mapping.type_name,
            properties = mapping.properties.len(),
            filters = metadata.filters().len(),
            facets = metadata.facets().len(),
            "Class mapping compiled"
        );

        Ok(CompiledClass {
            class_name: class.name.clone(),
            is_abstract: class.is_abstract,
            mapping,
            settings,
            metadata,
        })
    }

    fn class_mapping(&self, class: &ClassDef, properties: Properties, slots: SpecialSlots) -> ClassMapping {
        let document = class.directives.document.clone().unwrap_or_default();
        let catch_all = class.directives.catch_all.as_ref();
        ClassMapping {
            type_name: Self::type_name(class),
            all: AllSlot {
                enabled: document.all,
                store: catch_all.map(|c| c.store),
                analyzer: catch_all.and_then(|c| c.analyzer.clone()),
            },
            source: SourceSlot { enabled: document.source },
            type_slot: TypeSlot { store: document.store, index: document.index },
            id: slots.id,
            routing: slots.routing,
            boost: slots.boost,
            timestamp: slots.timestamp,
            properties,
        }
    }

    /// Compile every member of `class` (and its ancestors) into `properties`.
    fn compile_members(
        &self,
        class: &ClassDef,
        properties: &mut Properties,
        scope: &Scope,
        state: &mut CompileState<'a>,
    ) -> Result<(), MappingError> {
        state.expanding.push(class.name.clone());
        for member in TypeIntrospector::new(self.catalog).members(&class.name)? {
            self.compile_member(&member, properties, scope, state)?;
        }
        state.expanding.pop();
        Ok(())
    }

    fn compile_member(
        &self,
        member: &IndexableMember,
        properties: &mut Properties,
        scope: &Scope,
        state: &mut CompileState<'a>,
    ) -> Result<(), MappingError> {
        let path = scope.prefix.child(member.name());

        if scope.is_root() {
            state.slots.collect(member, &state.class);
        }
        state.collector.collect(member, &path, scope.nested_root.as_ref())?;

        let ty = member.ty();
        match ty {
            t if t.is_scalar() => self.compile_leaf(member, t, properties, state),
            TypeRef::Enum(_) => self.compile_enum(member, properties, state),
            TypeRef::Array(element) | TypeRef::Collection(element) => match element.as_ref() {
                t if t.is_scalar() => self.compile_leaf(member, t, properties, state),
                TypeRef::Enum(_) => self.compile_enum(member, properties, state),
                other => self.compile_composite(member, other, &path, properties, scope, state),
            },
            TypeRef::Map(_, value) => match member.map_key_value() {
                Some(key_spec) => self.compile_map(member, key_spec, value, &path, properties, scope, state),
                None => self.compile_composite(member, ty, &path, properties, scope, state),
            },
            TypeRef::Object(_) => self.compile_composite(member, ty, &path, properties, scope, state),
            // unreachable: scalars are matched first
            TypeRef::Primitive(_) | TypeRef::String | TypeRef::Date => Ok(()),
        }
    }

    fn compile_enum(
        &self,
        member: &IndexableMember,
        properties: &mut Properties,
        state: &mut CompileState<'a>,
    ) -> Result<(), MappingError> {
        if member.string_spec().is_none() {
            debug!(class = %member.declaring_class(), field = %member.name(), "Enum without string mapping skipped");
            return Ok(());
        }
        self.compile_leaf(member, &TypeRef::String, properties, state)
    }

    fn compile_leaf(
        &self,
        member: &IndexableMember,
        scalar: &TypeRef,
        properties: &mut Properties,
        state: &mut CompileState<'a>,
    ) -> Result<(), MappingError> {
        if !member.shapes_mapping() {
            return Ok(());
        }

        let name = member.name();
        let claims_type = member.directives().iter().any(Directive::claims_leaf_type);
        let reset = match properties.get(name) {
            None => true,
            Some(PropertyNode::Leaf(leaf)) => claims_type && leaf.field_type.is_some(),
            Some(PropertyNode::Composite(_)) => true,
        };
        if reset {
            if properties.contains_key(name) {
                self.warn_redeclared(member, state);
            }
            properties.insert(name.to_string(), PropertyNode::Leaf(LeafMapping::default()));
        }

        match properties.get_mut(name) {
            Some(PropertyNode::Leaf(leaf)) => apply_leaf_directives(leaf, member, scalar, &state.class),
            _ => Ok(()),
        }
    }

    fn compile_composite(
        &self,
        member: &IndexableMember,
        target: &TypeRef,
        path: &FieldPath,
        properties: &mut Properties,
        scope: &Scope,
        state: &mut CompileState<'a>,
    ) -> Result<(), MappingError> {
        let (mut node, replacement) = if let Some(spec) = member.nested_object() {
            (CompositeMapping::nested(), spec.nested_class.clone())
        } else if let Some(spec) = member.object_field() {
            (CompositeMapping::object().with_enabled(spec.enabled), spec.object_class.clone())
        } else {
            (CompositeMapping::object(), None)
        };

        let target_class = replacement.or_else(|| match target {
            TypeRef::Object(class) => Some(class.clone()),
            _ => None,
        });

        if node.enabled != Some(false) {
            match target_class {
                Some(class) => {
                    let child_scope = Scope {
                        prefix: path.clone(),
                        nested_root: match node.kind {
                            CompositeKind::Nested => Some(path.clone()),
                            CompositeKind::Object => scope.nested_root.clone(),
                        },
                    };
                    let class = self.resolve_target(member, &class, state)?;
                    self.compile_members(&class, &mut node.properties, &child_scope, state)?;
                }
                None => {
                    debug!(class = %member.declaring_class(), field = %member.name(), ty = %target, "No class to expand, empty object");
                }
            }
        }

        if properties.contains_key(member.name()) {
            self.warn_redeclared(member, state);
        }
        properties.insert(member.name().to_string(), PropertyNode::Composite(node));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn compile_map(
        &self,
        member: &IndexableMember,
        key_spec: &StringFieldSpec,
        value_type: &TypeRef,
        path: &FieldPath,
        properties: &mut Properties,
        scope: &Scope,
        state: &mut CompileState<'a>,
    ) -> Result<(), MappingError> {
        let mut node = CompositeMapping::object().with_enabled(true);
        node.properties
            .insert("key".to_string(), PropertyNode::Leaf(map_key_leaf(key_spec)));

        let value = match value_type.element() {
            t if t.is_scalar() => PropertyNode::Leaf(inferred_leaf(t)),
            TypeRef::Enum(_) => PropertyNode::Leaf(inferred_leaf(&TypeRef::String)),
            TypeRef::Object(class) => {
                let mut composite = CompositeMapping::object();
                let value_scope = Scope {
                    prefix: path.child("value"),
                    nested_root: scope.nested_root.clone(),
                };
                let class = self.resolve_target(member, class, state)?;
                self.compile_members(&class, &mut composite.properties, &value_scope, state)?;
                PropertyNode::Composite(composite)
            }
            _ => PropertyNode::Composite(CompositeMapping::object()),
        };
        node.properties.insert("value".to_string(), value);

        if properties.contains_key(member.name()) {
            self.warn_redeclared(member, state);
        }
        properties.insert(member.name().to_string(), PropertyNode::Composite(node));
        Ok(())
    }

    /// Look up a class to recurse into, refusing cycles.
    fn resolve_target(
        &self,
        member: &IndexableMember,
        class: &str,
        state: &CompileState<'a>,
    ) -> Result<Arc<ClassDef>, MappingError> {
        if state.expanding.iter().any(|c| c == class) {
            return Err(MappingError::RecursiveType {
                class: class.to_string(),
                member: member.name().to_string(),
            });
        }
        self.catalog
            .get(class)
            .ok_or_else(|| MappingError::UnknownClass(class.to_string()))
    }

    fn warn_redeclared(&self, member: &IndexableMember, state: &CompileState<'a>) {
        warn!(
            class = %state.class,
            field = %member.name(),
            declared_in = %member.declaring_class(),
            "Field mapping redeclared, later declaration wins"
        );
        metrics::record_override("redeclared_field");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::directive::{
        BoostSpec, DateFieldSpec, NestedObjectSpec, NumberFieldSpec, NumberType, ObjectFieldSpec,
        RoutingSpec, TermFilterSpec, TimestampSpec,
    };
    use crate::model::{DocumentSettings, FieldDef, PrimitiveKind};
    use crate::mapping::LeafType;
    use serde_json::json;

    fn compile(classes: Vec<ClassDef>, target: &str) -> Result<CompiledClass, MappingError> {
        let catalog = ClassCatalog::new();
        for class in classes {
            catalog.register(class);
        }
        let config = MappingConfig::default();
        MappingCompiler::new(&catalog, &config).compile(target)
    }

    fn string(name: &str, spec: StringFieldSpec) -> FieldDef {
        FieldDef::new(name, TypeRef::String).with(Directive::StringField(spec))
    }

    fn leaf_type(compiled: &CompiledClass, path: &str) -> Option<LeafType> {
        compiled.mapping().property(path)?.as_leaf()?.field_type
    }

    #[test]
    fn test_default_type_name() {
        let compiled = compile(vec![ClassDef::new("org.example.Person").document(DocumentSettings::default())], "org.example.Person").unwrap();
        assert_eq!(compiled.type_name(), "person");

        let compiled = compile(vec![ClassDef::new("a.Person").type_name("human")], "a.Person").unwrap();
        assert_eq!(compiled.type_name(), "human");
    }

    #[test]
    fn test_members_without_directives_emit_nothing() {
        let compiled = compile(
            vec![ClassDef::new("a.A").property(FieldDef::new("plain", TypeRef::String))],
            "a.A",
        )
        .unwrap();
        assert!(compiled.mapping().properties.is_empty());
    }

    #[test]
    fn test_special_slots_first_wins() {
        let compiled = compile(
            vec![ClassDef::new("a.A")
                .property(FieldDef::new("id", TypeRef::String).with(Directive::Id))
                .property(FieldDef::new("otherId", TypeRef::String).with(Directive::Id))
                .property(FieldDef::new("tenant", TypeRef::String).with(Directive::Routing(RoutingSpec { required: true })))
                .property(FieldDef::new("weight", TypeRef::Primitive(PrimitiveKind::Float)).with(Directive::Boost(BoostSpec::default())))
                .property(FieldDef::new("created", TypeRef::Date).with(Directive::Timestamp(TimestampSpec { format: Some("date_time".into()) })))],
            "a.A",
        )
        .unwrap();
        let mapping = compiled.mapping();
        assert_eq!(mapping.id, Some(IdSlot { path: "id".into() }));
        assert_eq!(mapping.routing, Some(RoutingSlot { path: "tenant".into(), required: true }));
        assert_eq!(mapping.boost, Some(BoostSlot { name: "weight".into(), null_value: 1.0 }));
        assert_eq!(mapping.timestamp.as_ref().unwrap().format.as_deref(), Some("date_time"));
    }

    #[test]
    fn test_special_slots_ignored_below_root() {
        let compiled = compile(
            vec![
                ClassDef::new("a.City").property(FieldDef::new("code", TypeRef::String).with(Directive::Id)),
                ClassDef::new("a.A").property(
                    FieldDef::new("city", TypeRef::object("a.City"))
                        .with(Directive::ObjectField(ObjectFieldSpec::default())),
                ),
            ],
            "a.A",
        )
        .unwrap();
        assert_eq!(compiled.mapping().id, None);
    }

    #[test]
    fn test_nested_object() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Address").property(string("city", StringFieldSpec::not_analyzed())),
                ClassDef::new("a.Person").property(
                    FieldDef::new("address", TypeRef::object("a.Address"))
                        .with(Directive::NestedObject(NestedObjectSpec::default())),
                ),
            ],
            "a.Person",
        )
        .unwrap();
        let address = compiled.mapping().property("address").unwrap().as_composite().unwrap();
        assert_eq!(address.kind, CompositeKind::Nested);
        assert_eq!(leaf_type(&compiled, "address.city"), Some(LeafType::Keyword));
    }

    #[test]
    fn test_nested_replacement_class() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Shape"),
                ClassDef::new("a.Circle").property(FieldDef::new("radius", TypeRef::Primitive(PrimitiveKind::Double))
                    .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Double)))),
                ClassDef::new("a.Drawing").property(
                    FieldDef::new("shapes", TypeRef::list_of(TypeRef::object("a.Shape")))
                        .with(Directive::NestedObject(NestedObjectSpec { nested_class: Some("a.Circle".into()) })),
                ),
            ],
            "a.Drawing",
        )
        .unwrap();
        assert_eq!(leaf_type(&compiled, "shapes.radius"), Some(LeafType::Double));
    }

    #[test]
    fn test_disabled_object_does_not_recurse() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Blob").property(string("data", StringFieldSpec::analyzed())),
                ClassDef::new("a.A").property(
                    FieldDef::new("blob", TypeRef::object("a.Blob"))
                        .with(Directive::ObjectField(ObjectFieldSpec { object_class: None, enabled: false })),
                ),
            ],
            "a.A",
        )
        .unwrap();
        let value = serde_json::to_value(compiled.mapping().property("blob").unwrap()).unwrap();
        assert_eq!(value, json!({"type": "object", "enabled": false}));
    }

    #[test]
    fn test_default_object_recurses() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Geo").property(
                    FieldDef::new("lat", TypeRef::Primitive(PrimitiveKind::Double))
                        .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Double))),
                ),
                ClassDef::new("a.A").property(FieldDef::new("geo", TypeRef::object("a.Geo"))),
            ],
            "a.A",
        )
        .unwrap();
        let geo = compiled.mapping().property("geo").unwrap().as_composite().unwrap();
        assert_eq!(geo.kind, CompositeKind::Object);
        assert_eq!(geo.enabled, None);
        assert_eq!(leaf_type(&compiled, "geo.lat"), Some(LeafType::Double));
    }

    #[test]
    fn test_unknown_target_class() {
        let err = compile(
            vec![ClassDef::new("a.A").property(FieldDef::new("x", TypeRef::object("a.Missing")))],
            "a.A",
        )
        .unwrap_err();
        assert_eq!(err, MappingError::UnknownClass("a.Missing".into()));
    }

    #[test]
    fn test_recursive_class_rejected() {
        let err = compile(
            vec![ClassDef::new("a.Node").property(FieldDef::new("parent", TypeRef::object("a.Node")))],
            "a.Node",
        )
        .unwrap_err();
        assert_eq!(err, MappingError::RecursiveType { class: "a.Node".into(), member: "parent".into() });
    }

    #[test]
    fn test_same_class_twice_is_not_a_cycle() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Address").property(string("city", StringFieldSpec::not_analyzed())),
                ClassDef::new("a.A")
                    .property(FieldDef::new("home", TypeRef::object("a.Address")))
                    .property(FieldDef::new("work", TypeRef::object("a.Address"))),
            ],
            "a.A",
        )
        .unwrap();
        assert!(compiled.mapping().property("home.city").is_some());
        assert!(compiled.mapping().property("work.city").is_some());
    }

    #[test]
    fn test_enum_requires_string_directive() {
        let compiled = compile(
            vec![ClassDef::new("a.A")
                .property(FieldDef::new("status", TypeRef::Enum("a.Status".into())))
                .property(
                    FieldDef::new("tags", TypeRef::array_of(TypeRef::Enum("a.Tag".into())))
                        .with(Directive::StringField(StringFieldSpec::not_analyzed())),
                )],
            "a.A",
        )
        .unwrap();
        assert!(compiled.mapping().property("status").is_none());
        assert_eq!(leaf_type(&compiled, "tags"), Some(LeafType::Keyword));
    }

    #[test]
    fn test_collection_of_dates_is_leaf() {
        let compiled = compile(
            vec![ClassDef::new("a.A").property(
                FieldDef::new("visits", TypeRef::list_of(TypeRef::Date))
                    .with(Directive::DateField(DateFieldSpec::default())),
            )],
            "a.A",
        )
        .unwrap();
        assert_eq!(leaf_type(&compiled, "visits"), Some(LeafType::Date));
    }

    #[test]
    fn test_map_key_value() {
        let compiled = compile(
            vec![ClassDef::new("a.A").property(
                FieldDef::new("labels", TypeRef::map_of(TypeRef::String, TypeRef::Primitive(PrimitiveKind::Long)))
                    .with(Directive::MapKeyValue(StringFieldSpec::not_analyzed())),
            )],
            "a.A",
        )
        .unwrap();
        let value = serde_json::to_value(compiled.mapping().property("labels").unwrap()).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["enabled"], true);
        assert_eq!(value["properties"]["key"]["type"], "keyword");
        assert_eq!(value["properties"]["value"], json!({"type": "long"}));
    }

    #[test]
    fn test_map_value_filters_under_value_path() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Price").property(
                    FieldDef::new("currency", TypeRef::String)
                        .with(Directive::StringField(StringFieldSpec::not_analyzed()))
                        .with(Directive::TermFilter(TermFilterSpec::default())),
                ),
                ClassDef::new("a.A").property(
                    FieldDef::new("prices", TypeRef::map_of(TypeRef::String, TypeRef::object("a.Price")))
                        .with(Directive::MapKeyValue(StringFieldSpec::analyzed())),
                ),
            ],
            "a.A",
        )
        .unwrap();
        assert!(compiled.metadata().filter("prices.value.currency").is_some());
        assert_eq!(leaf_type(&compiled, "prices.value.currency"), Some(LeafType::Keyword));
        assert_eq!(leaf_type(&compiled, "prices.key"), Some(LeafType::Text));
    }

    #[test]
    fn test_map_without_directive_is_empty_object() {
        let compiled = compile(
            vec![ClassDef::new("a.A").property(FieldDef::new(
                "extra",
                TypeRef::map_of(TypeRef::String, TypeRef::String),
            ))],
            "a.A",
        )
        .unwrap();
        let value = serde_json::to_value(compiled.mapping().property("extra").unwrap()).unwrap();
        assert_eq!(value, json!({"type": "object"}));
    }

    #[test]
    fn test_subclass_redeclaration_wins_in_place() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Base")
                    .property(string("name", StringFieldSpec::analyzed()))
                    .property(string("code", StringFieldSpec::analyzed())),
                ClassDef::new("a.Child")
                    .extends("a.Base")
                    .property(string("name", StringFieldSpec::not_analyzed())),
            ],
            "a.Child",
        )
        .unwrap();
        let keys: Vec<&String> = compiled.mapping().properties.keys().collect();
        assert_eq!(keys, vec!["name", "code"]);
        assert_eq!(leaf_type(&compiled, "name"), Some(LeafType::Keyword));
    }

    fn address_class() -> ClassDef {
        ClassDef::new("a.Address")
            .property(string("city", StringFieldSpec::not_analyzed()))
            .property(string("zip", StringFieldSpec::not_analyzed()))
    }

    #[test]
    fn test_subclass_leaf_replaces_composite() {
        let compiled = compile(
            vec![
                address_class(),
                ClassDef::new("a.Base").property(
                    FieldDef::new("address", TypeRef::object("a.Address"))
                        .with(Directive::NestedObject(NestedObjectSpec::default())),
                ),
                ClassDef::new("a.Child")
                    .extends("a.Base")
                    .property(string("address", StringFieldSpec::analyzed())),
            ],
            "a.Child",
        )
        .unwrap();

        assert_eq!(compiled.mapping().properties.len(), 1);
        let node = compiled.mapping().property("address").unwrap();
        let leaf = node.as_leaf().expect("address should be a leaf");
        assert_eq!(leaf.field_type, Some(LeafType::Text));
        assert!(leaf.fields.is_empty());
        assert!(compiled.mapping().property("address.city").is_none());

        let rendered = serde_json::to_value(node).unwrap();
        assert_eq!(rendered["type"], "text");
        assert!(rendered.get("properties").is_none());
    }

    #[test]
    fn test_subclass_composite_replaces_leaf() {
        let compiled = compile(
            vec![
                address_class(),
                ClassDef::new("a.Base").property(
                    FieldDef::new("address", TypeRef::String)
                        .with(Directive::StringField(StringFieldSpec::not_analyzed().stored()))
                        .with(Directive::IndexName("addr".into())),
                ),
                ClassDef::new("a.Child").extends("a.Base").property(
                    FieldDef::new("address", TypeRef::object("a.Address"))
                        .with(Directive::NestedObject(NestedObjectSpec::default())),
                ),
            ],
            "a.Child",
        )
        .unwrap();

        assert_eq!(compiled.mapping().properties.len(), 1);
        let node = compiled.mapping().property("address").unwrap();
        let composite = node.as_composite().expect("address should be a composite");
        assert_eq!(composite.kind, CompositeKind::Nested);
        let keys: Vec<&String> = composite.properties.keys().collect();
        assert_eq!(keys, vec!["city", "zip"]);

        let rendered = serde_json::to_value(node).unwrap();
        let object = rendered.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["properties", "type"]);
        assert_eq!(rendered["type"], "nested");
    }

    #[test]
    fn test_subclass_attribute_merges() {
        let compiled = compile(
            vec![
                ClassDef::new("a.Base").property(string("name", StringFieldSpec::analyzed())),
                ClassDef::new("a.Child")
                    .extends("a.Base")
                    .property(FieldDef::new("name", TypeRef::String).with(Directive::SearchAnalyzer("simple".into()))),
            ],
            "a.Child",
        )
        .unwrap();
        let leaf = compiled.mapping().property("name").unwrap().as_leaf().unwrap();
        assert_eq!(leaf.field_type, Some(LeafType::Text));
        assert_eq!(leaf.search_analyzer.as_deref(), Some("simple"));
    }

    #[test]
    fn test_abstract_class_compiles_without_index_mapping() {
        let compiled = compile(
            vec![ClassDef::new("a.Base")
                .abstract_class()
                .property(string("name", StringFieldSpec::analyzed()).with(Directive::TermFilter(TermFilterSpec::default())))],
            "a.Base",
        )
        .unwrap();
        assert!(compiled.is_abstract());
        assert!(compiled.index_mapping().is_none());
        assert_eq!(compiled.metadata().filters().len(), 1);
    }

    #[test]
    fn test_numeric_directive_on_string_fails_whole_class() {
        let err = compile(
            vec![ClassDef::new("a.A")
                .property(string("ok", StringFieldSpec::analyzed()))
                .property(
                    FieldDef::new("bad", TypeRef::String)
                        .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Integer))),
                )],
            "a.A",
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::UnsupportedNumericType { .. }));
    }
}
