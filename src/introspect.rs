// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Member discovery across a class hierarchy.
//!
//! A class contributes an [`IndexableMember`] for every non-transient field
//! that has a usable reader/writer pair, and for every accessor pair that has
//! no backing field. Directives placed on the field take precedence over
//! directives of the same kind placed on the reader.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::ClassCatalog;
use crate::error::MappingError;
use crate::model::directive::{
    BooleanFieldSpec, BoostSpec, DateFieldSpec, FetchContextSpec, MultiFieldSpec,
    NestedObjectSpec, NumberFieldSpec, ObjectFieldSpec, RangeSpec, RoutingSpec, StringFieldSpec,
    TermFilterSpec, TermsFacetSpec, TimestampSpec,
};
use crate::model::{AccessorDef, ClassDef, Directive, FieldDef, TypeRef};

/// A property of a class that can take part in an index mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexableMember {
    name: String,
    ty: TypeRef,
    declaring_class: String,
    directives: Vec<Directive>,
}

macro_rules! directive_lookup {
    ($($fn_name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            pub fn $fn_name(&self) -> Option<&$ty> {
                self.directives.iter().find_map(|d| match d {
                    Directive::$variant(spec) => Some(spec),
                    _ => None,
                })
            }
        )*
    };
}

impl IndexableMember {
    /// Build a member from a field, its accessor pair, or both.
    ///
    /// Fails if neither is given, if the accessor cannot both read and
    /// write, or if field and accessor disagree on the type.
    pub fn new(
        class: &str,
        field: Option<&FieldDef>,
        accessor: Option<&AccessorDef>,
    ) -> Result<Self, MappingError> {
        let invalid = |member: &str, reason: &str| MappingError::InvalidMember {
            class: class.to_string(),
            member: member.to_string(),
            reason: reason.to_string(),
        };

        let (name, ty) = match (field, accessor) {
            (None, None) => return Err(invalid("?", "neither a field nor an accessor")),
            (_, Some(acc)) if !acc.is_usable() => {
                return Err(invalid(&acc.property, "accessor pair is missing a reader or a writer"));
            }
            (Some(f), Some(acc)) if f.ty != acc.ty => {
                return Err(MappingError::TypeMismatch {
                    class: class.to_string(),
                    member: f.name.clone(),
                    field_type: f.ty.to_string(),
                    accessor_type: acc.ty.to_string(),
                });
            }
            (Some(f), _) => (f.property_name(), f.ty.clone()),
            (None, Some(acc)) => (acc.property.clone(), acc.ty.clone()),
        };

        let directives = field
            .map(|f| f.directives.iter())
            .into_iter()
            .flatten()
            .chain(accessor.map(|a| a.directives.iter()).into_iter().flatten())
            .cloned()
            .collect();

        Ok(Self {
            name,
            ty,
            declaring_class: class.to_string(),
            directives,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn is_id(&self) -> bool {
        self.directives.iter().any(|d| matches!(d, Directive::Id))
    }

    /// Whether any directive contributes to the property tree.
    pub fn shapes_mapping(&self) -> bool {
        self.directives.iter().any(Directive::shapes_mapping)
    }

    directive_lookup! {
        routing => Routing(RoutingSpec),
        boost => Boost(BoostSpec),
        timestamp => Timestamp(TimestampSpec),
        string_field => StringField(StringFieldSpec),
        multi_field => MultiField(MultiFieldSpec),
        number_field => NumberField(NumberFieldSpec),
        date_field => DateField(DateFieldSpec),
        date_format => DateFormat(String),
        boolean_field => BooleanField(BooleanFieldSpec),
        index_name => IndexName(String),
        null_value => NullValue(String),
        analyzer => Analyzer(String),
        index_analyzer => IndexAnalyzer(String),
        search_analyzer => SearchAnalyzer(String),
        nested_object => NestedObject(NestedObjectSpec),
        object_field => ObjectField(ObjectFieldSpec),
        map_key_value => MapKeyValue(StringFieldSpec),
        term_filter => TermFilter(TermFilterSpec),
        range_filter => RangeFilter(RangeSpec),
        terms_facet => TermsFacet(TermsFacetSpec),
        range_facet => RangeFacet(RangeSpec),
        fetch_context => FetchContext(FetchContextSpec),
    }

    /// String spec governing how values of this member are tokenized:
    /// the plain string directive, else the main spec of a multi-field.
    pub fn string_spec(&self) -> Option<&StringFieldSpec> {
        self.string_field().or_else(|| self.multi_field().map(|m| &m.main))
    }
}

/// Walks class hierarchies registered in a [`ClassCatalog`].
pub struct TypeIntrospector<'a> {
    catalog: &'a ClassCatalog,
}

impl<'a> TypeIntrospector<'a> {
    pub fn new(catalog: &'a ClassCatalog) -> Self {
        Self { catalog }
    }

    /// The class and its registered ancestors, root-most first.
    ///
    /// The chain ends at the first superclass that is not registered.
    pub fn hierarchy(&self, class: &str) -> Result<Vec<Arc<ClassDef>>, MappingError> {
        let leaf = self
            .catalog
            .get(class)
            .ok_or_else(|| MappingError::UnknownClass(class.to_string()))?;

        let mut seen = HashSet::new();
        seen.insert(leaf.name.clone());
        let mut chain = vec![leaf];

        while let Some(parent) = chain.last().and_then(|c| c.superclass.clone()) {
            if !seen.insert(parent.clone()) {
                return Err(MappingError::RecursiveType {
                    class: class.to_string(),
                    member: format!("superclass {}", parent),
                });
            }
            match self.catalog.get(&parent) {
                Some(def) => chain.push(def),
                None => {
                    debug!(class = %class, superclass = %parent, "Superclass not registered, hierarchy ends");
                    break;
                }
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Indexable members of the class and its ancestors, superclass members
    /// first. A member redeclared by a subclass appears once per declaring
    /// class; the compiler lets the later one win.
    pub fn members(&self, class: &str) -> Result<Vec<IndexableMember>, MappingError> {
        let mut members = Vec::new();
        for def in self.hierarchy(class)? {
            members.extend(self.declared_members(&def)?);
        }
        Ok(members)
    }

    /// Indexable members declared directly on `class`.
    pub fn declared_members(&self, class: &ClassDef) -> Result<Vec<IndexableMember>, MappingError> {
        let mut members = Vec::new();
        let mut claimed: HashSet<String> = HashSet::new();

        for field in &class.fields {
            let property = field.property_name();
            claimed.insert(property.clone());

            if field.transient {
                debug!(class = %class.name, field = %field.name, "Transient field skipped");
                continue;
            }

            match class.accessors.iter().find(|a| a.property == property) {
                Some(accessor) if accessor.is_usable() => {
                    members.push(IndexableMember::new(&class.name, Some(field), Some(accessor))?);
                }
                _ => {
                    debug!(class = %class.name, field = %field.name, "No reader/writer pair, field skipped");
                }
            }
        }

        for accessor in &class.accessors {
            if claimed.contains(&accessor.property) {
                continue;
            }
            if !accessor.is_usable() {
                debug!(class = %class.name, property = %accessor.property, "Accessor without reader/writer pair skipped");
                continue;
            }
            claimed.insert(accessor.property.clone());
            members.push(IndexableMember::new(&class.name, None, Some(accessor))?);
        }

        Ok(members)
    }
}
