//! Cache facade metrics.

use metrics::{counter, describe_counter};

/// Metric names for the cache layer.
pub mod names {
    /// Cache-aside reads answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "infovault_cache_hits_total";
    /// Cache-aside reads that found no entry.
    pub const CACHE_MISSES_TOTAL: &str = "infovault_cache_misses_total";
    /// Cache operations that failed and were bypassed.
    pub const CACHE_ERRORS_TOTAL: &str = "infovault_cache_errors_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of cache-aside reads answered from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of cache-aside reads that missed"
    );
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of cache operations that failed"
    );
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache hit.
    pub fn hit(operation: &str) {
        counter!(names::CACHE_HITS_TOTAL, "operation" => operation.to_string()).increment(1);
    }

    /// Record a cache miss.
    pub fn miss(operation: &str) {
        counter!(names::CACHE_MISSES_TOTAL, "operation" => operation.to_string()).increment(1);
    }

    /// Record a failed cache operation.
    pub fn error(operation: &str, error_code: &'static str) {
        counter!(
            names::CACHE_ERRORS_TOTAL,
            "operation" => operation.to_string(),
            "error" => error_code
        )
        .increment(1);
    }
}
