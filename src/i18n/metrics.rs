//! Catalog lookup metrics.
//!
//! Counts how often a message key resolved to a translation and how often it
//! fell back to the raw key. A growing miss count points at call sites that
//! emit keys missing from the tables.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Catalog lookup counters.
#[derive(Debug, Default)]
pub struct CatalogMetrics {
    /// Lookups that found a translation
    hits: AtomicUsize,

    /// Lookups that fell back to the raw key
    misses: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<CatalogMetrics> = OnceLock::new();

impl CatalogMetrics {
    /// Create a detached set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the global catalog metrics instance.
    pub fn global() -> &'static CatalogMetrics {
        METRICS.get_or_init(CatalogMetrics::new)
    }

    /// Record a lookup that found a translation.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that fell back to the raw key.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let misses = self.misses();
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            misses,
            hit_rate,
        }
    }
}

/// Snapshot of the catalog counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub misses: usize,

    /// Hit rate as a percentage (0-100)
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_hit() {
        let metrics = CatalogMetrics::new();
        assert_eq!(metrics.hits(), 0);
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.hits(), 2);
    }

    #[test]
    fn test_record_miss() {
        let metrics = CatalogMetrics::new();
        assert_eq!(metrics.misses(), 0);
        metrics.record_miss();
        assert_eq!(metrics.misses(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = CatalogMetrics::new().report();
        assert_eq!(report.hits, 0);
        assert_eq!(report.misses, 0);
        assert_eq!(report.hit_rate, 0.0);
    }

    #[test]
    fn test_report_hit_rate() {
        let metrics = CatalogMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        let report = metrics.report();
        assert_eq!(report.hits, 3);
        assert_eq!(report.misses, 1);
        assert_eq!(report.hit_rate, 75.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = CatalogMetrics::new();
        metrics.record_hit();
        let json = serde_json::to_value(metrics.report()).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["hit_rate"], 100.0);
    }

    // ==================== Singleton Tests ====================

    #[test]
    fn test_global_returns_same_instance() {
        let metrics1 = CatalogMetrics::global();
        let metrics2 = CatalogMetrics::global();
        assert!(std::ptr::eq(metrics1, metrics2));
    }

    #[test]
    fn test_global_counts_are_monotonic() {
        // Other tests hit the global catalog concurrently, so only compare deltas
        let metrics = CatalogMetrics::global();
        let initial = metrics.misses();
        metrics.record_miss();
        assert!(metrics.misses() > initial);
    }
}
