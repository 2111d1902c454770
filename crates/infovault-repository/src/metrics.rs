//! Query executor metrics.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Metric names for the data access layer.
pub mod names {
    /// Total statements completed, labelled by shape and outcome.
    pub const QUERIES_TOTAL: &str = "infovault_queries_total";
    /// Statement duration in seconds, measured from dispatch to delivery.
    pub const QUERY_DURATION_SECONDS: &str = "infovault_query_duration_seconds";
    /// Statements currently holding an executor permit.
    pub const QUERIES_IN_FLIGHT: &str = "infovault_queries_in_flight";
    /// Statements abandoned because their deadline elapsed.
    pub const QUERIES_TIMED_OUT_TOTAL: &str = "infovault_queries_timed_out_total";
    /// Best-effort reads that fell back to a default value.
    pub const QUERY_FALLBACKS_TOTAL: &str = "infovault_query_fallbacks_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::QUERIES_TOTAL,
        "Total number of statements completed"
    );
    describe_histogram!(
        names::QUERY_DURATION_SECONDS,
        "Statement duration in seconds"
    );
    describe_gauge!(
        names::QUERIES_IN_FLIGHT,
        "Number of statements currently executing"
    );
    describe_counter!(
        names::QUERIES_TIMED_OUT_TOTAL,
        "Total number of statements that exceeded their deadline"
    );
    describe_counter!(
        names::QUERY_FALLBACKS_TOTAL,
        "Total number of best-effort reads answered with a default value"
    );
}

/// Query metrics recorder.
#[derive(Clone)]
pub struct QueryMetrics;

impl QueryMetrics {
    /// Record a completed statement.
    pub fn completed(shape: &'static str, outcome: &'static str, duration: Duration) {
        counter!(
            names::QUERIES_TOTAL,
            "shape" => shape,
            "outcome" => outcome
        )
        .increment(1);

        histogram!(
            names::QUERY_DURATION_SECONDS,
            "shape" => shape
        )
        .record(duration.as_secs_f64());
    }

    /// Record a statement abandoned at its deadline.
    pub fn timed_out(shape: &'static str) {
        counter!(
            names::QUERIES_TIMED_OUT_TOTAL,
            "shape" => shape
        )
        .increment(1);
    }

    /// Record a best-effort read that returned its default.
    pub fn fallback(shape: &'static str) {
        counter!(
            names::QUERY_FALLBACKS_TOTAL,
            "shape" => shape
        )
        .increment(1);
    }

    /// Marks a statement as running until the returned guard drops.
    pub fn in_flight() -> InFlight {
        gauge!(names::QUERIES_IN_FLIGHT).increment(1.0);
        InFlight
    }
}

/// Decrements the in-flight gauge on drop.
#[derive(Debug)]
pub struct InFlight;

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!(names::QUERIES_IN_FLIGHT).decrement(1.0);
    }
}
