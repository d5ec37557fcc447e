//! Metrics definitions for fetch operations.
//!
//! Metrics are collected using the `metrics` crate. Nothing is exported
//! unless the embedding application installs a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "graphql_requests_total",
        "Total number of GraphQL requests issued by fetch operations"
    );
    describe_counter!(
        "graphql_query_errors_total",
        "Total number of responses carrying GraphQL errors"
    );
    describe_counter!(
        "pages_fetched_total",
        "Total number of result pages received by paginated fetches"
    );
    describe_counter!(
        "records_fetched_total",
        "Total number of records normalized from responses"
    );
    describe_histogram!(
        "fetch_duration_seconds",
        "Time taken by a complete fetch operation in seconds"
    );
}

/// Record an issued request.
///
/// # Arguments
/// * `accessor` - The queried accessor (e.g. "tokens")
pub fn record_request(accessor: &str) {
    counter!("graphql_requests_total", "accessor" => accessor.to_string()).increment(1);
}

/// Record a response that carried GraphQL errors.
pub fn record_query_error(accessor: &str) {
    counter!("graphql_query_errors_total", "accessor" => accessor.to_string()).increment(1);
}

/// Record a received page and the number of records it held.
pub fn record_page(accessor: &str, records: usize) {
    counter!("pages_fetched_total", "accessor" => accessor.to_string()).increment(1);
    counter!("records_fetched_total", "accessor" => accessor.to_string())
        .increment(records as u64);
}

/// A timer that records the fetch duration when dropped.
pub struct FetchTimer {
    start: Instant,
}

impl FetchTimer {
    /// Start a new fetch timer.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for FetchTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FetchTimer {
    fn drop(&mut self) {
        histogram!("fetch_duration_seconds").record(self.start.elapsed().as_secs_f64());
    }
}
