// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for mapping compilation and query assembly.
//!
//! Compile errors are fatal for the class being compiled: nothing is
//! published to the registry. Conflicts that have a sensible resolution
//! (duplicate special slots, re-declared field types, a facet replacing a
//! filter) are logged as warnings instead and never surface here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Class '{0}' is not registered in the catalog")]
    UnknownClass(String),

    #[error("Invalid member '{member}' on '{class}': {reason}")]
    InvalidMember {
        class: String,
        member: String,
        reason: String,
    },

    #[error("Field '{member}' on '{class}' is declared as {field_type} but its accessors use {accessor_type}")]
    TypeMismatch {
        class: String,
        member: String,
        field_type: String,
        accessor_type: String,
    },

    #[error("Number mapping on '{class}.{member}' requires a numeric type, found {found}")]
    UnsupportedNumericType {
        class: String,
        member: String,
        found: String,
    },

    #[error("Class '{class}' recursively contains itself through '{member}'")]
    RecursiveType { class: String, member: String },

    #[error("Invalid ranges on '{class}.{member}': expected an even number of at least 2 values, got {count}")]
    InvalidRanges {
        class: String,
        member: String,
        count: usize,
    },

    #[error("Fetch context on '{class}.{member}' lists {contexts} contexts but {flags} include flags")]
    FetchContextMismatch {
        class: String,
        member: String,
        contexts: usize,
        flags: usize,
    },

    #[error("Path generator '{generator}' used on '{class}.{member}' is not registered")]
    UnknownPathGenerator {
        class: String,
        member: String,
        generator: String,
    },

    #[error("Failed to serialize the document for '{class}': {reason}")]
    Serialization { class: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Filter on '{0}' was given an empty value list")]
    EmptyFilterValues(String),

    #[error("Invalid range value '{value}' for '{field}'")]
    InvalidRangeValue { field: String, value: String },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}
