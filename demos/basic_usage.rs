// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic es-mapping usage example.
//!
//! Demonstrates:
//! 1. Declaring document classes in a catalog
//! 2. Compiling the mapping and settings documents
//! 3. Inspecting registered filters and facets
//! 4. Building a filtered, faceted search request
//! 5. Building a count request
//! 6. Displaying metrics
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::sync::Arc;

use es_mapping::model::directive::{
    FetchContextSpec, NestedObjectSpec, NumberFieldSpec, NumberType, RangeSpec, StringFieldSpec, TermFilterSpec,
    TermsFacetSpec,
};
use es_mapping::model::{ClassDef, Directive, DocumentSettings, FieldDef, PrimitiveKind, TypeRef};
use es_mapping::search::SortOrder;
use es_mapping::{ClassCatalog, CountQueryBuilder, DslTranslator, MappingRegistry, SearchQueryBuilder};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("metrics recorder already installed");

    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("es-mapping demo\n===============\n");

    // 1. Declare classes
    println!("📦 Registering classes...");
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassDef::new("demo.Address")
            .property(
                FieldDef::new("city", TypeRef::String)
                    .with(Directive::StringField(StringFieldSpec::not_analyzed()))
                    .with(Directive::TermsFacet(TermsFacetSpec::default())),
            )
            .property(
                FieldDef::new("street", TypeRef::String)
                    .with(Directive::StringField(StringFieldSpec::analyzed())),
            ),
    );
    catalog.register(
        ClassDef::new("demo.Person")
            .document(DocumentSettings::default())
            .property(FieldDef::new("id", TypeRef::String).with(Directive::Id))
            .property(
                FieldDef::new("lastname", TypeRef::String)
                    .with(Directive::StringField(StringFieldSpec::analyzed()))
                    .with(Directive::TermFilter(TermFilterSpec::default()))
                    .with(Directive::FetchContext(FetchContextSpec::include("summary"))),
            )
            .property(
                FieldDef::new("age", TypeRef::Primitive(PrimitiveKind::Int))
                    .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Integer)))
                    .with(Directive::RangeFacet(RangeSpec { ranges: vec![18.0, 30.0, 50.0, 65.0] })),
            )
            .property(
                FieldDef::new("address", TypeRef::object("demo.Address"))
                    .with(Directive::NestedObject(NestedObjectSpec::default())),
            ),
    );
    println!("   └─ {} classes in catalog", catalog.len());

    let registry = MappingRegistry::new(Arc::new(catalog));
    let compiled = registry.initialize(&["demo"])?;
    println!("   ✅ Compiled {} document class(es)", compiled);

    // 2. Mapping and settings documents
    println!("\n📄 Mapping document:");
    if let Some(mapping) = registry.mapping_document("demo.Person")? {
        println!("{}", serde_json::to_string_pretty(&mapping)?);
    }
    println!("\n⚙️  Settings document:");
    println!("{}", serde_json::to_string_pretty(&registry.settings_document("demo.Person")?)?);

    // 3. Query metadata
    println!("\n🔎 Filters:");
    for filter in registry.filters("demo.Person")? {
        let nested = filter.nested_path().map(|p| format!(" (nested in {})", p)).unwrap_or_default();
        println!("   └─ {} [{:?}]{}", filter.es_field_name(), filter.kind(), nested);
    }
    println!("📊 Facets:");
    for facet in registry.facets("demo.Person")? {
        println!("   └─ {}", facet.name());
    }

    // 4. Search request
    let request = SearchQueryBuilder::new(&registry)
        .index("people")
        .class("demo.Person")
        .text("smi")
        .filter("address.city", vec!["Paris".to_string()])
        .filter("age", vec!["18 - 30".to_string(), "65 -".to_string()])
        .fetch_context("summary")
        .with_facets()
        .sort_by("age", SortOrder::Asc)
        .build()?;
    println!("\n🚀 POST {}", request.endpoint());
    println!("{}", serde_json::to_string_pretty(&DslTranslator::search_body(&request))?);

    // 5. Count request
    let count = CountQueryBuilder::new(&registry)
        .index("people")
        .class("demo.Person")
        .filter("lastname", vec!["Smith".to_string()])
        .build()?;
    println!("\n🔢 POST {}", count.endpoint());
    println!("{}", serde_json::to_string_pretty(&DslTranslator::count_body(&count))?);

    // Unknown fetch contexts are reported, not silently empty
    let missing = registry.fetch_context("demo.Person", "detail")?;
    println!("\n❓ Fetch context 'detail': {:?}", missing);

    // 6. Metrics
    let stats = registry.stats();
    println!(
        "\n📈 Registry: {} hit(s), {} compile(s), {} entries",
        stats.hits, stats.compiles, stats.entry_count
    );
    print_metrics(&snapshotter);

    println!("\n✅ Done.");
    Ok(())
}

/// Print every counter and histogram the library recorded, sorted by name.
fn print_metrics(snapshotter: &Snapshotter) {
    let mut lines: Vec<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| {
            let name = key.key().name().to_string();
            match value {
                DebugValue::Counter(total) => Some(format!("{} = {}", name, total)),
                DebugValue::Histogram(samples) => {
                    let seconds: f64 = samples.iter().map(|s| s.into_inner()).sum();
                    Some(format!("{} n={} total={:.6}s", name, samples.len(), seconds))
                }
                DebugValue::Gauge(_) => None,
            }
        })
        .collect();
    lines.sort();

    if lines.is_empty() {
        println!("   (nothing recorded)");
    }
    for line in lines {
        println!("   · {}", line);
    }
}
