//! Firestore metrics.
//!
//! Request counters and latency by operation, retry counters, and the number
//! of documents returned by queries.

use metrics::{counter, histogram};

/// Metric name constants.
pub mod names {
    /// Firestore requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "jobboard_firestore_requests_total";

    /// Retry attempts by operation.
    pub const RETRIES_TOTAL: &str = "jobboard_firestore_retries_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "jobboard_firestore_latency_seconds";

    /// Documents returned by runQuery, by collection.
    pub const QUERY_DOCUMENTS_RETURNED_TOTAL: &str = "jobboard_firestore_query_documents_total";

    /// Atomic counter increments, by collection and outcome.
    pub const INCREMENTS_TOTAL: &str = "jobboard_firestore_increments_total";
}

/// Record a completed Firestore request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a retry attempt.
pub fn record_retry(operation: &str) {
    counter!(
        names::RETRIES_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record an increment of a counter field.
pub fn record_increment(collection: &str, ok: bool) {
    counter!(
        names::INCREMENTS_TOTAL,
        "collection" => collection.to_string(),
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [
            names::REQUESTS_TOTAL,
            names::RETRIES_TOTAL,
            names::LATENCY_SECONDS,
            names::QUERY_DOCUMENTS_RETURNED_TOTAL,
            names::INCREMENTS_TOTAL,
        ] {
            assert!(name.starts_with("jobboard_firestore_"), "{name}");
        }
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("get_document", 200, 12.0);
        record_retry("run_query");
        record_increment("jobs", true);
    }
}
