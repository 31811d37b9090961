// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for es-mapping.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for choosing the exporter.
//!
//! # Metric Naming Convention
//! - `es_mapping_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `class`: fully-qualified class name
//! - `kind`: search, count
//! - `reason`: why a warning was raised

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record a class compiled and published to the registry
pub fn record_class_compiled(class: &str) {
    counter!(
        "es_mapping_classes_compiled_total",
        "class" => class.to_string()
    )
    .increment(1);
}

/// Record a compilation that failed and published nothing
pub fn record_compile_failure(class: &str) {
    counter!(
        "es_mapping_compile_failures_total",
        "class" => class.to_string()
    )
    .increment(1);
}

/// Record compilation latency
pub fn record_compile_latency(class: &str, duration: Duration) {
    histogram!(
        "es_mapping_compile_seconds",
        "class" => class.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a query request assembled
pub fn record_query_assembled(kind: &str) {
    counter!(
        "es_mapping_queries_assembled_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record a requested fetch context the class does not declare
pub fn record_fetch_context_miss(class: &str) {
    counter!(
        "es_mapping_fetch_context_misses_total",
        "class" => class.to_string()
    )
    .increment(1);
}

/// Record a conflict resolved by keeping one side and logging a warning
pub fn record_override(reason: &str) {
    counter!(
        "es_mapping_overrides_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Helper for timing compilation
pub struct LatencyTimer {
    class: String,
    start: Instant,
}

impl LatencyTimer {
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_compile_latency(&self.class, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these are no-ops; they must not panic.
    #[test]
    fn test_recording_without_recorder() {
        record_class_compiled("org.example.Person");
        record_compile_failure("org.example.Person");
        record_query_assembled("search");
        record_fetch_context_miss("org.example.Person");
        record_override("duplicate_id");
        let _timer = LatencyTimer::new("org.example.Person");
    }
}
