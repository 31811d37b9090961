//! Shared class fixtures for the integration tests.
//!
//! ```text
//! app.model.Person (document)
//!   ├─ lastname    text, term filter, fetch contexts
//!   ├─ firstname   text + raw keyword, term filter
//!   ├─ age         integer, range facet
//!   ├─ address     nested app.model.Address
//!   │    ├─ city       keyword, terms facet
//!   │    ├─ zip        keyword, term filter
//!   │    └─ location   object app.model.Geo
//!   ├─ tags        keyword[], term filter
//!   └─ attributes  map<string, string>
//! app.model.Employee extends Person (document)
//!   └─ company     text, terms facet (all terms)
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use es_mapping::model::directive::{
    AlternateField, BooleanFieldSpec, DateFieldSpec, FetchContextSpec, MultiFieldSpec, NestedObjectSpec,
    NumberFieldSpec, NumberType, RangeSpec, RoutingSpec, StringFieldSpec, TermFilterSpec, TermsFacetSpec,
};
use es_mapping::model::{AnalyzerDefinition, ClassDef, Directive, DocumentSettings, FieldDef, PrimitiveKind, TypeRef};
use es_mapping::{ClassCatalog, MappingRegistry};

pub const PERSON: &str = "app.model.Person";
pub const EMPLOYEE: &str = "app.model.Employee";
pub const ADDRESS: &str = "app.model.Address";

fn string(name: &str, spec: StringFieldSpec) -> FieldDef {
    FieldDef::new(name, TypeRef::String).with(Directive::StringField(spec))
}

pub fn person() -> ClassDef {
    ClassDef::new(PERSON)
        .document(DocumentSettings::default())
        .analyzer(AnalyzerDefinition::custom("lowercase_keyword", "keyword").filter("lowercase"))
        .property(FieldDef::new("id", TypeRef::String).with(Directive::Id))
        .property(
            string("country", StringFieldSpec::not_analyzed())
                .with(Directive::Routing(RoutingSpec { required: true })),
        )
        .property(
            string("lastname", StringFieldSpec::analyzed())
                .with(Directive::TermFilter(TermFilterSpec::default()))
                .with(Directive::FetchContext(FetchContextSpec::include("summary").and("detail", true))),
        )
        .property(
            FieldDef::new("firstname", TypeRef::String)
                .with(Directive::MultiField(MultiFieldSpec {
                    main: StringFieldSpec::analyzed(),
                    alternates: vec![AlternateField::new("raw", StringFieldSpec::not_analyzed())],
                }))
                .with(Directive::TermFilter(TermFilterSpec::default())),
        )
        .property(
            FieldDef::new("age", TypeRef::Primitive(PrimitiveKind::Int))
                .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Integer)))
                .with(Directive::RangeFacet(RangeSpec { ranges: vec![18.0, 30.0, 40.0, 65.0] })),
        )
        .property(FieldDef::new("birthdate", TypeRef::Date).with(Directive::DateField(DateFieldSpec {
            format: Some("yyyy-MM-dd".into()),
            ..Default::default()
        })))
        .property(
            FieldDef::new("active", TypeRef::Primitive(PrimitiveKind::Boolean))
                .with(Directive::BooleanField(BooleanFieldSpec::default())),
        )
        .property(
            FieldDef::new("address", TypeRef::object(ADDRESS))
                .with(Directive::NestedObject(NestedObjectSpec::default()))
                .with(Directive::FetchContext(FetchContextSpec::exclude("summary").and("detail", true))),
        )
        .property(
            FieldDef::new("tags", TypeRef::list_of(TypeRef::String))
                .with(Directive::StringField(StringFieldSpec::not_analyzed()))
                .with(Directive::TermFilter(TermFilterSpec::default())),
        )
        .property(
            FieldDef::new("attributes", TypeRef::map_of(TypeRef::String, TypeRef::String))
                .with(Directive::MapKeyValue(StringFieldSpec::not_analyzed())),
        )
        .property(string("notes", StringFieldSpec::analyzed()).transient())
}

pub fn address() -> ClassDef {
    ClassDef::new(ADDRESS)
        .property(
            string("city", StringFieldSpec::not_analyzed()).with(Directive::TermsFacet(TermsFacetSpec::default())),
        )
        .property(string("zip", StringFieldSpec::not_analyzed()).with(Directive::TermFilter(TermFilterSpec::default())))
        .property(FieldDef::new("location", TypeRef::object("app.model.Geo")))
}

pub fn geo() -> ClassDef {
    ClassDef::new("app.model.Geo")
        .property(
            FieldDef::new("lat", TypeRef::Primitive(PrimitiveKind::Double))
                .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Double))),
        )
        .property(
            FieldDef::new("lon", TypeRef::Primitive(PrimitiveKind::Double))
                .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Double))),
        )
}

pub fn employee() -> ClassDef {
    ClassDef::new(EMPLOYEE)
        .extends(PERSON)
        .document(DocumentSettings::default())
        .type_name("employee")
        .property(string("company", StringFieldSpec::analyzed()).with(Directive::TermsFacet(TermsFacetSpec {
            all_terms: true,
            ..Default::default()
        })))
}

pub fn catalog() -> Arc<ClassCatalog> {
    let catalog = ClassCatalog::new();
    for class in [person(), address(), geo(), employee()] {
        catalog.register(class);
    }
    Arc::new(catalog)
}

pub fn registry() -> MappingRegistry {
    MappingRegistry::new(catalog())
}
