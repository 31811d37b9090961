//! # ES Mapping
//!
//! Compiles declarative class metadata into search engine type mappings and
//! assembles search requests against the compiled classes.
//!
//! ## Architecture
//!
//! Compilation is lazy and happens once per class:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ClassCatalog                           │
//! │  • ClassDef: fields, accessors, directives                 │
//! │  • Namespace scanning, path generators                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (TypeIntrospector: members, superclass first)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    MappingCompiler                          │
//! │  • Property tree: leaves, objects, nested objects          │
//! │  • Special slots: _id, _routing, _boost, _timestamp        │
//! │  • FilterFacetCollector: filters, facets, fetch contexts   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (build, then publish once)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    MappingRegistry                          │
//! │  • DashMap<class, Arc<CompiledClass>>                      │
//! │  • Mapping and settings documents                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (read only, at request time)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            SearchQueryBuilder / CountQueryBuilder           │
//! │  • Seed query, filters, nested envelopes                   │
//! │  • Aggregations, sort, source projection                   │
//! │  • DslTranslator → JSON request body                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use es_mapping::model::directive::{StringFieldSpec, TermFilterSpec};
//! use es_mapping::model::{ClassDef, Directive, FieldDef, TypeRef};
//! use es_mapping::{ClassCatalog, DslTranslator, MappingRegistry, SearchQueryBuilder};
//!
//! let catalog = ClassCatalog::new();
//! catalog.register(
//!     ClassDef::new("app.model.Person")
//!         .document(Default::default())
//!         .property(FieldDef::new("id", TypeRef::String).with(Directive::Id))
//!         .property(
//!             FieldDef::new("lastname", TypeRef::String)
//!                 .with(Directive::StringField(StringFieldSpec::analyzed()))
//!                 .with(Directive::TermFilter(TermFilterSpec::default())),
//!         ),
//! );
//!
//! let registry = MappingRegistry::new(Arc::new(catalog));
//! let mapping = registry.mapping_document("app.model.Person").unwrap().unwrap();
//! assert_eq!(mapping["person"]["properties"]["lastname"]["type"], "text");
//!
//! let request = SearchQueryBuilder::new(&registry)
//!     .index("people")
//!     .class("app.model.Person")
//!     .filter("lastname", vec!["Smith".to_string()])
//!     .build()
//!     .unwrap();
//! let body = DslTranslator::search_body(&request);
//! assert_eq!(body["query"]["bool"]["must"][1]["term"]["lastname"], "smith");
//! ```
//!
//! ## Configuration
//!
//! See [`MappingConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`model`]: Class definitions and directives
//! - [`catalog`]: Class registration and namespace scanning
//! - [`introspect`]: Indexable member discovery
//! - [`mapping`]: The compiler and the mapping document model
//! - [`registry`]: Compile-once cache of compiled classes
//! - [`search`]: Filters, facets and request builders

pub mod catalog;
pub mod config;
pub mod error;
pub mod introspect;
pub mod mapping;
pub mod metrics;
pub mod model;
pub mod path;
pub mod registry;
pub mod search;

pub use catalog::{ClassCatalog, PathGenerator};
pub use config::MappingConfig;
pub use error::{MappingError, QueryError};
pub use introspect::{IndexableMember, TypeIntrospector};
pub use mapping::{ClassMapping, CompiledClass, IndexSettings, MappingCompiler, PropertyNode};
pub use model::{ClassDef, Indexed};
pub use path::FieldPath;
pub use registry::{MappingRegistry, RegistryStats};
pub use search::{
    CountQueryBuilder, DslTranslator, FacetDescriptor, FilterDescriptor, FilterStrategy, QueryAdapter, QueryNode,
    SearchQueryBuilder, SourceFetchContext,
};
pub use metrics::LatencyTimer;
