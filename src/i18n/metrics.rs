//! Translation lookup metrics.
//!
//! Counts how lookups were resolved: directly, through the canonical
//! language, or not at all (the key itself was shown).

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global lookup metrics singleton.
pub struct LookupMetrics {
    /// Lookups answered in the requested language
    hits: AtomicUsize,

    /// Lookups answered by the canonical language
    fallbacks: AtomicUsize,

    /// Lookups answered with the key itself
    misses: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<LookupMetrics> = OnceLock::new();

impl LookupMetrics {
    /// Get the global lookup metrics instance.
    pub fn global() -> &'static LookupMetrics {
        METRICS.get_or_init(|| LookupMetrics {
            hits: AtomicUsize::new(0),
            fallbacks: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        })
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let misses = self.misses();
        let total = hits + fallbacks + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            fallbacks,
            misses,
            hit_rate,
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the lookup counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub fallbacks: usize,
    pub misses: usize,
    /// Percentage of lookups answered in the requested language
    pub hit_rate: f64,
}

impl MetricsReport {
    /// Format the metrics as a human-readable log line.
    pub fn format_log(&self) -> String {
        format!(
            "Translation lookups: {} hits, {} fallbacks, {} misses ({:.1}% hit rate)",
            self.hits, self.fallbacks, self.misses, self.hit_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_counters_and_report() {
        let metrics = LookupMetrics::global();
        metrics.reset();

        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_fallback();

        let report = metrics.report();
        assert!(report.hits >= 3);
        assert!(report.fallbacks >= 1);
        assert!(report.hit_rate > 0.0 && report.hit_rate <= 100.0);
    }

    #[test]
    fn test_empty_report_rate_is_zero() {
        let report = MetricsReport {
            hits: 0,
            fallbacks: 0,
            misses: 0,
            hit_rate: 0.0,
        };
        assert!(report.format_log().contains("0 hits"));
    }

    #[test]
    fn test_format_log() {
        let report = MetricsReport {
            hits: 9,
            fallbacks: 1,
            misses: 0,
            hit_rate: 90.0,
        };
        assert_eq!(
            report.format_log(),
            "Translation lookups: 9 hits, 1 fallbacks, 0 misses (90.0% hit rate)"
        );
    }

    #[test]
    fn test_global_is_singleton() {
        assert!(std::ptr::eq(LookupMetrics::global(), LookupMetrics::global()));
    }
}
