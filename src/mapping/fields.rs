// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Leaf directive handlers.
//!
//! Type directives run first, in a fixed order (string, multi-field, number,
//! date, date format, boolean). When one finds the leaf already typed, the
//! later directive wins and the leaf is cleared before it is filled.
//! Attribute directives (index name, null value, analyzers) run last so a
//! type reset never discards them.

use tracing::warn;

use super::property::{LeafMapping, LeafType, Norms};
use crate::error::MappingError;
use crate::introspect::IndexableMember;
use crate::metrics;
use crate::model::directive::{
    BooleanFieldSpec, DateFieldSpec, IndexType, MultiFieldSpec, NumberFieldSpec, StringFieldSpec,
    TermVector,
};
use crate::model::{PrimitiveKind, TypeRef};

/// Apply every leaf directive of `member` to `leaf`.
///
/// `scalar` is the member's value type with arrays/collections unwrapped;
/// number directives are validated against it.
pub fn apply_leaf_directives(
    leaf: &mut LeafMapping,
    member: &IndexableMember,
    scalar: &TypeRef,
    class: &str,
) -> Result<(), MappingError> {
    if let Some(spec) = member.string_field() {
        claim(leaf, member, "string");
        fill_string(leaf, spec);
    }
    if let Some(spec) = member.multi_field() {
        claim(leaf, member, "multi_field");
        fill_multi_field(leaf, spec);
    }
    if let Some(spec) = member.number_field() {
        if scalar.number_type().is_none() {
            return Err(MappingError::UnsupportedNumericType {
                class: class.to_string(),
                member: member.name().to_string(),
                found: member.ty().to_string(),
            });
        }
        claim(leaf, member, "number");
        fill_number(leaf, spec);
    }
    if let Some(spec) = member.date_field() {
        claim(leaf, member, "date");
        fill_date(leaf, spec);
    }
    if let Some(format) = member.date_format() {
        if leaf.field_type != Some(LeafType::Date) {
            claim(leaf, member, "date_format");
            leaf.field_type = Some(LeafType::Date);
        }
        leaf.format = Some(format.clone());
    }
    if let Some(spec) = member.boolean_field() {
        claim(leaf, member, "boolean");
        fill_boolean(leaf, spec);
    }

    if let Some(name) = member.index_name() {
        leaf.index_name = Some(name.clone());
    }
    if let Some(value) = member.null_value() {
        leaf.null_value = Some(value.clone());
    }
    if let Some(analyzer) = member.analyzer() {
        leaf.analyzer = Some(analyzer.clone());
    }
    if let Some(analyzer) = member.index_analyzer() {
        leaf.index_analyzer = Some(analyzer.clone());
    }
    if let Some(analyzer) = member.search_analyzer() {
        leaf.search_analyzer = Some(analyzer.clone());
    }

    Ok(())
}

/// Clear a leaf that an earlier type directive already filled.
fn claim(leaf: &mut LeafMapping, member: &IndexableMember, directive: &str) {
    if let Some(previous) = leaf.field_type {
        warn!(
            class = %member.declaring_class(),
            field = %member.name(),
            previous = previous.as_str(),
            directive,
            "Conflicting type directives, later one wins"
        );
        metrics::record_override("conflicting_type");
        *leaf = LeafMapping::default();
    }
}

pub fn fill_string(leaf: &mut LeafMapping, spec: &StringFieldSpec) {
    leaf.field_type = Some(match spec.index {
        IndexType::Analyzed => LeafType::Text,
        IndexType::NotAnalyzed | IndexType::No => LeafType::Keyword,
    });
    leaf.index = Some(spec.index != IndexType::No);
    leaf.store = Some(spec.store);
    leaf.boost = Some(spec.boost);
    leaf.include_in_all = Some(spec.include_in_all);
    leaf.term_vector = (spec.term_vector != TermVector::No).then_some(spec.term_vector);
    leaf.null_value = spec.null_value.clone();
    leaf.norms = if spec.norms_enabled.is_some() || spec.norms_loading.is_some() {
        Some(Norms { enabled: spec.norms_enabled, loading: spec.norms_loading })
    } else {
        None
    };
    leaf.index_options = spec.index_options;
    leaf.analyzer = spec.analyzer.clone();
    leaf.index_analyzer = spec.index_analyzer.clone();
    leaf.search_analyzer = spec.search_analyzer.clone();
    leaf.ignore_above = spec.ignore_above;
}

/// Map keys are always strings; analyzed keys need fielddata to be
/// aggregatable.
pub fn map_key_leaf(spec: &StringFieldSpec) -> LeafMapping {
    let mut leaf = LeafMapping::default();
    fill_string(&mut leaf, spec);
    if spec.index == IndexType::Analyzed {
        leaf.fielddata = Some(true);
    }
    leaf
}

fn fill_multi_field(leaf: &mut LeafMapping, spec: &MultiFieldSpec) {
    fill_string(leaf, &spec.main);
    leaf.fields = spec
        .alternates
        .iter()
        .map(|alternate| {
            let mut sub = LeafMapping::default();
            fill_string(&mut sub, &alternate.spec);
            (alternate.name.clone(), sub)
        })
        .collect();
}

fn fill_number(leaf: &mut LeafMapping, spec: &NumberFieldSpec) {
    leaf.field_type = Some(spec.number_type.into());
    leaf.index = Some(spec.index);
    leaf.store = Some(spec.store);
    leaf.boost = Some(spec.boost);
    leaf.include_in_all = Some(spec.include_in_all);
    leaf.ignore_malformed = spec.ignore_malformed.then_some(true);
}

fn fill_date(leaf: &mut LeafMapping, spec: &DateFieldSpec) {
    leaf.field_type = Some(LeafType::Date);
    leaf.index = Some(spec.index);
    leaf.store = Some(spec.store);
    leaf.boost = Some(spec.boost);
    leaf.include_in_all = Some(spec.include_in_all);
    leaf.ignore_malformed = spec.ignore_malformed.then_some(true);
    leaf.format = spec.format.clone();
}

fn fill_boolean(leaf: &mut LeafMapping, spec: &BooleanFieldSpec) {
    leaf.field_type = Some(LeafType::Boolean);
    leaf.index = Some(spec.index);
    leaf.store = Some(spec.store);
    leaf.boost = Some(spec.boost);
}

/// Leaf used for scalar map values, which carry no directives of their own.
pub fn inferred_leaf(scalar: &TypeRef) -> LeafMapping {
    let field_type = match scalar {
        TypeRef::Primitive(PrimitiveKind::Boolean) => LeafType::Boolean,
        TypeRef::Date => LeafType::Date,
        other => other.number_type().map_or(LeafType::Keyword, LeafType::from),
    };
    LeafMapping::typed(field_type)
}
