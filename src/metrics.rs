use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Metric names emitted by the storage and repository layers.
///
/// Nothing is recorded unless the host application installs a `metrics`
/// recorder; without one every call here is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct StoreMetrics {
    /// Counter of store calls by operation and outcome
    pub store_operations_total: &'static str,
    /// Histogram of store call durations
    pub store_operation_duration: &'static str,
    /// Counter of failed store calls
    pub store_errors_total: &'static str,
    /// Counter of values that failed to decode
    pub malformed_collections_total: &'static str,
    /// Counter of records written
    pub records_written_total: &'static str,
    /// Gauge of records per collection after a write
    pub collection_size: &'static str,
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self {
            store_operations_total: "wellbeing_store_operations_total",
            store_operation_duration: "wellbeing_store_operation_duration_seconds",
            store_errors_total: "wellbeing_store_errors_total",
            malformed_collections_total: "wellbeing_malformed_collections_total",
            records_written_total: "wellbeing_records_written_total",
            collection_size: "wellbeing_collection_size",
        }
    }
}

impl StoreMetrics {
    /// Record one raw key-value store call
    pub fn record_store_operation(&self, operation: &'static str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };

        counter!(self.store_operations_total, "operation" => operation, "status" => status).increment(1);
        histogram!(self.store_operation_duration, "operation" => operation).record(duration.as_secs_f64());

        if !success {
            counter!(self.store_errors_total, "operation" => operation).increment(1);
        }
    }

    /// Record a stored collection that failed to decode and was replaced by an empty one
    pub fn record_malformed_collection(&self, prefix: &'static str) {
        counter!(self.malformed_collections_total, "prefix" => prefix).increment(1);
    }

    /// Record a full-collection rewrite
    #[allow(clippy::cast_precision_loss)]
    pub fn record_collection_write(&self, prefix: &'static str, len: usize) {
        counter!(self.records_written_total, "prefix" => prefix).increment(len as u64);
        gauge!(self.collection_size, "prefix" => prefix).set(len as f64);
    }
}

/// Times a single store call and reports it on `finish`
pub struct MetricsTimer {
    metrics: StoreMetrics,
    operation: &'static str,
    start: Instant,
}

impl MetricsTimer {
    /// Start timing a store call
    #[must_use]
    pub fn new(metrics: StoreMetrics, operation: &'static str) -> Self {
        Self {
            metrics,
            operation,
            start: Instant::now(),
        }
    }

    /// Record the duration and, on failure, an error
    pub fn finish(self, success: bool) {
        let duration = self.start.elapsed();
        self.metrics.record_store_operation(self.operation, duration, success);
    }
}
