// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Compiled Class Registry
//!
//! Caches one [`CompiledClass`] per class name. Compilation happens on first
//! access, outside any map lock, and the result is published once.
//!
//! # Flow
//!
//! ```text
//! compiled("a.Person")
//!       │
//!       ▼
//! ┌─────────────────────────────┐
//! │  DashMap lookup             │
//! └─────────────────────────────┘
//!       │
//!       ├─→ Hit  → return Arc<CompiledClass>
//!       │
//!       └─→ Miss → compile, then entry().or_insert
//!                  (first publication wins, errors publish nothing)
//! ```
//!
//! Two threads racing on the same class may both compile it; the loser's
//! result is dropped and both receive the published entry.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::ClassCatalog;
use crate::config::MappingConfig;
use crate::error::MappingError;
use crate::mapping::{ClassMapping, CompiledClass, MappingCompiler};
use crate::metrics;
use crate::search::{FacetDescriptor, FilterDescriptor, SourceFetchContext};

/// Process-wide cache of compiled classes.
pub struct MappingRegistry {
    catalog: Arc<ClassCatalog>,
    config: MappingConfig,
    compiled: DashMap<String, Arc<CompiledClass>>,
    hits: AtomicU64,
    compiles: AtomicU64,
}

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Compilations run, including lost publication races and failures
    pub compiles: u64,
    /// Published classes
    pub entry_count: usize,
}

impl MappingRegistry {
    pub fn new(catalog: Arc<ClassCatalog>) -> Self {
        Self::with_config(catalog, MappingConfig::default())
    }

    pub fn with_config(catalog: Arc<ClassCatalog>, config: MappingConfig) -> Self {
        Self {
            catalog,
            config,
            compiled: DashMap::new(),
            hits: AtomicU64::new(0),
            compiles: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Compiled artifacts of a class, compiling it on first access.
    pub fn compiled(&self, class: &str) -> Result<Arc<CompiledClass>, MappingError> {
        if let Some(entry) = self.compiled.get(class) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(entry.value()));
        }

        self.compiles.fetch_add(1, Ordering::Relaxed);
        let compiled = MappingCompiler::new(&self.catalog, &self.config).compile(class)?;
        let published = self
            .compiled
            .entry(class.to_string())
            .or_insert_with(|| Arc::new(compiled));
        Ok(Arc::clone(published.value()))
    }

    /// Whether a class has already been published.
    pub fn is_compiled(&self, class: &str) -> bool {
        self.compiled.contains_key(class)
    }

    /// Mapping of a class, abstract classes included.
    pub fn mapping(&self, class: &str) -> Result<ClassMapping, MappingError> {
        Ok(self.compiled(class)?.mapping().clone())
    }

    /// Mapping document to send to the engine; `None` for abstract classes.
    pub fn mapping_document(&self, class: &str) -> Result<Option<Value>, MappingError> {
        let compiled = self.compiled(class)?;
        compiled.index_mapping().map(|mapping| to_document(class, mapping)).transpose()
    }

    /// Index settings document (default field and analyzers).
    pub fn settings_document(&self, class: &str) -> Result<Value, MappingError> {
        to_document(class, self.compiled(class)?.settings())
    }

    pub fn type_name(&self, class: &str) -> Result<String, MappingError> {
        Ok(self.compiled(class)?.type_name().to_string())
    }

    pub fn filters(&self, class: &str) -> Result<Vec<FilterDescriptor>, MappingError> {
        Ok(self.compiled(class)?.metadata().filters().to_vec())
    }

    pub fn facets(&self, class: &str) -> Result<Vec<FacetDescriptor>, MappingError> {
        Ok(self.compiled(class)?.metadata().facets().to_vec())
    }

    /// Source projection registered under `context`.
    ///
    /// `Ok(None)` means the class never declared that context, which is
    /// distinct from a declared context that happens to be empty.
    pub fn fetch_context(&self, class: &str, context: &str) -> Result<Option<SourceFetchContext>, MappingError> {
        let compiled = self.compiled(class)?;
        let found = compiled.metadata().fetch_context(context).cloned();
        if found.is_none() {
            warn!(class = %class, context = %context, "Fetch context not declared");
            metrics::record_fetch_context_miss(class);
        }
        Ok(found)
    }

    /// Eagerly compile every document class under the given namespaces.
    ///
    /// Returns the number of classes compiled; the first failure aborts the
    /// batch. Classes published before the failure stay published.
    pub fn initialize<S: AsRef<str>>(&self, namespaces: &[S]) -> Result<usize, MappingError> {
        let mut count = 0;
        for namespace in namespaces {
            let namespace = namespace.as_ref();
            let classes = self.catalog.scan(namespace);
            debug!(namespace = %namespace, classes = classes.len(), "Scanning namespace");
            for class in classes {
                self.compiled(&class.name)?;
                count += 1;
            }
        }
        info!(classes = count, "Mapping registry initialized");
        Ok(count)
    }

    pub fn compiled_count(&self) -> usize {
        self.compiled.len()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            hits: self.hits.load(Ordering::Relaxed),
            compiles: self.compiles.load(Ordering::Relaxed),
            entry_count: self.compiled.len(),
        }
    }
}

impl std::fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("config", &self.config)
            .field("compiled", &self.compiled.len())
            .finish()
    }
}

fn to_document<T: serde::Serialize>(class: &str, value: &T) -> Result<Value, MappingError> {
    serde_json::to_value(value).map_err(|e| MappingError::Serialization {
        class: class.to_string(),
        reason: e.to_string(),
    })
}
