// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Class catalog: the lookup table the compiler resolves class names against.
//!
//! # Example
//!
//! ```rust
//! use es_mapping::catalog::ClassCatalog;
//! use es_mapping::model::{ClassDef, DocumentSettings};
//!
//! let catalog = ClassCatalog::new();
//! catalog.register(ClassDef::new("org.example.Person").document(DocumentSettings::default()));
//! catalog.register(ClassDef::new("org.example.Address"));
//!
//! assert!(catalog.contains("org.example.Address"));
//!
//! // Only document classes are discovered by a namespace scan
//! let found = catalog.scan("org.example");
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].name, "org.example.Person");
//! ```
//!
//! # Design
//!
//! - **Register once, read many**: classes are registered at startup and
//!   looked up on every compilation
//! - **Thread-safe**: uses `parking_lot::RwLock` for concurrent access
//! - **Shared definitions**: lookups hand out `Arc<ClassDef>`, never copies

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::model::{ClassDef, Indexed};

/// Expands the sub-paths configured on a filter or facet.
///
/// Registered by name in the catalog and referenced from directives via
/// `path_generator`.
pub trait PathGenerator: Send + Sync {
    fn paths(&self, declared: &[String]) -> Vec<String>;
}

impl<F> PathGenerator for F
where
    F: Fn(&[String]) -> Vec<String> + Send + Sync,
{
    fn paths(&self, declared: &[String]) -> Vec<String> {
        self(declared)
    }
}

#[derive(Default)]
pub struct ClassCatalog {
    classes: RwLock<HashMap<String, Arc<ClassDef>>>,
    path_generators: RwLock<HashMap<String, Arc<dyn PathGenerator>>>,
}

impl fmt::Debug for ClassCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassCatalog")
            .field("classes", &self.classes.read().len())
            .field("path_generators", &self.path_generators.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ClassCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. A class registered twice is replaced.
    pub fn register(&self, class: ClassDef) {
        debug!(class = %class.name, document = class.is_document(), "Class registered");
        self.classes.write().insert(class.name.clone(), Arc::new(class));
    }

    /// Register a Rust type that describes itself.
    pub fn register_type<T: Indexed>(&self) {
        self.register(T::class_def());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.classes.read().get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// Document classes inside a dotted namespace (including sub-namespaces),
    /// sorted by name. An empty namespace matches every document class.
    #[must_use]
    pub fn scan(&self, namespace: &str) -> Vec<Arc<ClassDef>> {
        let classes = self.classes.read();
        let mut found: Vec<Arc<ClassDef>> = classes
            .values()
            .filter(|class| class.is_document() && in_namespace(&class.name, namespace))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    pub fn register_path_generator(&self, name: impl Into<String>, generator: Arc<dyn PathGenerator>) {
        self.path_generators.write().insert(name.into(), generator);
    }

    #[must_use]
    pub fn path_generator(&self, name: &str) -> Option<Arc<dyn PathGenerator>> {
        self.path_generators.read().get(name).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }
}

fn in_namespace(class_name: &str, namespace: &str) -> bool {
    if namespace.is_empty() {
        return true;
    }
    class_name
        .strip_prefix(namespace)
        .is_some_and(|rest| rest.starts_with('.'))
}
