// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Class metadata model.
//!
//! Classes are described as plain data: a name, an optional superclass,
//! declared fields and bean-style accessors, each carrying [`Directive`]s.
//! Descriptions can be built in code or deserialized from JSON.
//!
//! # Example
//!
//! ```rust
//! use es_mapping::model::{ClassDef, FieldDef, TypeRef, PrimitiveKind, DocumentSettings};
//! use es_mapping::model::directive::{Directive, NumberFieldSpec, NumberType, StringFieldSpec};
//!
//! let person = ClassDef::new("org.example.Person")
//!     .document(DocumentSettings::default())
//!     .property(FieldDef::new("id", TypeRef::String).with(Directive::Id))
//!     .property(
//!         FieldDef::new("lastname", TypeRef::String)
//!             .with(Directive::StringField(StringFieldSpec::analyzed())),
//!     )
//!     .property(
//!         FieldDef::new("alienScore", TypeRef::Primitive(PrimitiveKind::Long))
//!             .with(Directive::NumberField(NumberFieldSpec::new(NumberType::Long))),
//!     );
//!
//! assert_eq!(person.simple_name(), "Person");
//! assert!(person.is_document());
//! ```

pub mod directive;

pub use directive::Directive;

use directive::{IndexType, NumberType};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

impl PrimitiveKind {
    /// Engine numeric type for this primitive, if it is numeric.
    pub fn number_type(&self) -> Option<NumberType> {
        match self {
            PrimitiveKind::Byte => Some(NumberType::Byte),
            PrimitiveKind::Short => Some(NumberType::Short),
            PrimitiveKind::Int => Some(NumberType::Integer),
            PrimitiveKind::Long => Some(NumberType::Long),
            PrimitiveKind::Float => Some(NumberType::Float),
            PrimitiveKind::Double => Some(NumberType::Double),
            PrimitiveKind::Boolean | PrimitiveKind::Char => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Char => "char",
        }
    }
}

/// Declared type of a field or accessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    String,
    Date,
    Enum(String),
    Array(Box<TypeRef>),
    Collection(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
    /// Reference to another class by fully-qualified name.
    Object(String),
}

impl TypeRef {
    pub fn object(class: impl Into<String>) -> Self {
        TypeRef::Object(class.into())
    }

    pub fn array_of(inner: TypeRef) -> Self {
        TypeRef::Array(Box::new(inner))
    }

    pub fn list_of(inner: TypeRef) -> Self {
        TypeRef::Collection(Box::new(inner))
    }

    pub fn map_of(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    /// Element type of arrays and collections, the type itself otherwise.
    /// Only one level is unwrapped.
    pub fn element(&self) -> &TypeRef {
        match self {
            TypeRef::Array(inner) | TypeRef::Collection(inner) => inner,
            other => other,
        }
    }

    /// Primitive, string and date values compile to leaf mappings.
    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeRef::Primitive(_) | TypeRef::String | TypeRef::Date)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveKind::Boolean))
    }

    pub fn number_type(&self) -> Option<NumberType> {
        match self {
            TypeRef::Primitive(kind) => kind.number_type(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{}", kind.as_str()),
            TypeRef::String => write!(f, "string"),
            TypeRef::Date => write!(f, "date"),
            TypeRef::Enum(name) => write!(f, "enum {}", name),
            TypeRef::Array(inner) => write!(f, "{}[]", inner),
            TypeRef::Collection(inner) => write!(f, "collection<{}>", inner),
            TypeRef::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            TypeRef::Object(name) => write!(f, "{}", name),
        }
    }
}

// =============================================================================
// Class-level directives
// =============================================================================

fn default_true() -> bool { true }

/// Marks a class as an index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Keep the original source document.
    #[serde(default = "default_true")]
    pub source: bool,
    /// Enable the catch-all field.
    #[serde(default = "default_true")]
    pub all: bool,
    /// Store the type name.
    #[serde(default)]
    pub store: bool,
    #[serde(default = "default_type_index")]
    pub index: IndexType,
}

fn default_type_index() -> IndexType { IndexType::NotAnalyzed }

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            source: true,
            all: true,
            store: false,
            index: IndexType::NotAnalyzed,
        }
    }
}

/// Storage and analysis of the catch-all field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatchAllSettings {
    #[serde(default)]
    pub store: bool,
    #[serde(default)]
    pub analyzer: Option<String>,
}

/// A custom analyzer published in the settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerDefinition {
    pub name: String,
    #[serde(default = "default_analyzer_type", rename = "type")]
    pub analyzer_type: String,
    #[serde(default)]
    pub tokenizer: Option<String>,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub char_filters: Vec<String>,
    #[serde(default)]
    pub stopwords: Vec<String>,
}

fn default_analyzer_type() -> String { "custom".to_string() }

impl AnalyzerDefinition {
    pub fn custom(name: impl Into<String>, tokenizer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            analyzer_type: default_analyzer_type(),
            tokenizer: Some(tokenizer.into()),
            filters: Vec::new(),
            char_filters: Vec::new(),
            stopwords: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn char_filter(mut self, filter: impl Into<String>) -> Self {
        self.char_filters.push(filter.into());
        self
    }

    pub fn stopword(mut self, word: impl Into<String>) -> Self {
        self.stopwords.push(word.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDirectives {
    #[serde(default)]
    pub document: Option<DocumentSettings>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub catch_all: Option<CatchAllSettings>,
    #[serde(default)]
    pub analyzers: Vec<AnalyzerDefinition>,
}

// =============================================================================
// Members
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub transient: bool,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            transient: false,
            directives: Vec::new(),
        }
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    pub fn with(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Property name this field is exposed under: boolean fields named
    /// `isX` are exposed as `x`.
    pub fn property_name(&self) -> String {
        if self.ty.is_boolean() {
            normalize_boolean_name(&self.name)
        } else {
            self.name.clone()
        }
    }
}

/// `isActive` -> `active`. Names that do not follow the pattern are
/// returned unchanged.
pub fn normalize_boolean_name(name: &str) -> String {
    match name.strip_prefix("is") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => {
            let mut chars = rest.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => name.to_string(),
            }
        }
        _ => name.to_string(),
    }
}

/// A bean-style property accessor pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessorDef {
    pub property: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "default_true")]
    pub readable: bool,
    #[serde(default = "default_true")]
    pub writable: bool,
    /// Directives attached to the reader.
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl AccessorDef {
    pub fn new(property: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            property: property.into(),
            ty,
            readable: true,
            writable: true,
            directives: Vec::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    pub fn with(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn is_usable(&self) -> bool {
        self.readable && self.writable
    }
}

// =============================================================================
// ClassDef
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Fully-qualified, dot separated (`org.example.Person`).
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub directives: ClassDirectives,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub accessors: Vec<AccessorDef>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            is_abstract: false,
            directives: ClassDirectives::default(),
            fields: Vec::new(),
            accessors: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn document(mut self, settings: DocumentSettings) -> Self {
        self.directives.document = Some(settings);
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.directives.type_name = Some(type_name.into());
        self
    }

    pub fn catch_all(mut self, settings: CatchAllSettings) -> Self {
        self.directives.catch_all = Some(settings);
        self
    }

    pub fn analyzer(mut self, analyzer: AnalyzerDefinition) -> Self {
        self.directives.analyzers.push(analyzer);
        self
    }

    /// Declare a field without accessors.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare an accessor pair without a backing field.
    pub fn accessor(mut self, accessor: AccessorDef) -> Self {
        self.accessors.push(accessor);
        self
    }

    /// Declare a field together with a matching read/write accessor pair.
    pub fn property(mut self, field: FieldDef) -> Self {
        self.accessors.push(AccessorDef::new(field.property_name(), field.ty.clone()));
        self.fields.push(field);
        self
    }

    /// Name after the last `.` (or `$` for inner classes).
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(|c| c == '.' || c == '$')
            .next()
            .unwrap_or(&self.name)
    }

    /// Dotted namespace the class lives in (empty for top-level names).
    pub fn namespace(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) => &self.name[..pos],
            None => "",
        }
    }

    pub fn is_document(&self) -> bool {
        self.directives.document.is_some()
    }
}

/// Implemented by Rust types that describe their own index metadata.
pub trait Indexed {
    fn class_def() -> ClassDef;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name_and_namespace() {
        let class = ClassDef::new("org.example.model.Person");
        assert_eq!(class.simple_name(), "Person");
        assert_eq!(class.namespace(), "org.example.model");

        let inner = ClassDef::new("org.example.Outer$Inner");
        assert_eq!(inner.simple_name(), "Inner");

        let bare = ClassDef::new("Person");
        assert_eq!(bare.simple_name(), "Person");
        assert_eq!(bare.namespace(), "");
    }

    #[test]
    fn test_boolean_name_normalization() {
        assert_eq!(normalize_boolean_name("isActive"), "active");
        assert_eq!(normalize_boolean_name("island"), "island");
        assert_eq!(normalize_boolean_name("is"), "is");
        assert_eq!(normalize_boolean_name("active"), "active");
    }

    #[test]
    fn test_property_name_only_normalizes_booleans() {
        let flag = FieldDef::new("isAlive", TypeRef::Primitive(PrimitiveKind::Boolean));
        assert_eq!(flag.property_name(), "alive");

        let text = FieldDef::new("isbn", TypeRef::String);
        assert_eq!(text.property_name(), "isbn");

        let named = FieldDef::new("isName", TypeRef::String);
        assert_eq!(named.property_name(), "isName");
    }

    #[test]
    fn test_property_adds_accessor_pair() {
        let class = ClassDef::new("a.B")
            .property(FieldDef::new("isAlive", TypeRef::Primitive(PrimitiveKind::Boolean)));
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.accessors.len(), 1);
        assert_eq!(class.accessors[0].property, "alive");
        assert!(class.accessors[0].is_usable());
    }

    #[test]
    fn test_type_element_unwraps_one_level() {
        let arr = TypeRef::array_of(TypeRef::Primitive(PrimitiveKind::Long));
        assert_eq!(arr.element(), &TypeRef::Primitive(PrimitiveKind::Long));
        assert!(arr.element().is_scalar());
        assert_eq!(arr.element().number_type(), Some(NumberType::Long));

        let nested = TypeRef::list_of(TypeRef::array_of(TypeRef::String));
        assert_eq!(nested.element(), &TypeRef::array_of(TypeRef::String));
    }

    #[test]
    fn test_type_display() {
        let ty = TypeRef::map_of(TypeRef::String, TypeRef::list_of(TypeRef::object("a.B")));
        assert_eq!(ty.to_string(), "map<string, collection<a.B>>");
    }

    #[test]
    fn test_class_def_from_json() {
        let json = r#"{
            "name": "org.example.City",
            "directives": { "document": {} },
            "fields": [
                { "name": "code", "type": "string", "directives": ["id"] },
                { "name": "tags", "type": { "collection": "string" } }
            ]
        }"#;
        let class: ClassDef = serde_json::from_str(json).unwrap();
        assert!(class.is_document());
        assert_eq!(class.fields[0].directives, vec![Directive::Id]);
        assert_eq!(class.fields[1].ty, TypeRef::list_of(TypeRef::String));
        assert!(!class.is_abstract);
    }
}
