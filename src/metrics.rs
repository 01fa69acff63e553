//! Prometheus metrics for the dispatcher and connection pool.
//!
//! Registered lazily with `once_cell::sync::Lazy` against the global
//! default registry, the same pattern the teacher used with `lazy_static!`
//! (swapped here since `once_cell` is the crate the rest of the pack
//! reaches for).

use crate::host::Host;
use once_cell::sync::Lazy;
use prometheus::{histogram_opts, opts, register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

pub static REQUEST_ATTEMPTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        opts!(
            "rest_client_request_attempts_total",
            "Total number of per-node request attempts issued"
        ),
        &["host", "outcome"] // outcome: success, retryable_http, terminal_http, transport
    )
    .unwrap()
});

pub static REQUEST_RETRIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        opts!(
            "rest_client_request_retries_total",
            "Total number of retries issued after a failed attempt"
        ),
        &["reason"] // reason: retryable_http, transport
    )
    .unwrap()
});

pub static REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "rest_client_request_duration_seconds",
            "End-to-end perform_request duration in seconds, across all attempts",
            vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
        ),
        &["method"]
    )
    .unwrap()
});

pub static NODE_HEALTH_STATUS: Lazy<prometheus::GaugeVec> = Lazy::new(|| {
    prometheus::register_gauge_vec!(
        opts!(
            "rest_client_node_health_status",
            "Health of a pooled node as last observed by the dispatcher (0=dead, 1=alive)"
        ),
        &["host"]
    )
    .unwrap()
});

pub static NODE_DEAD_COUNT: Lazy<prometheus::GaugeVec> = Lazy::new(|| {
    prometheus::register_gauge_vec!(
        opts!(
            "rest_client_node_dead_count",
            "Consecutive failure count for a pooled node"
        ),
        &["host"]
    )
    .unwrap()
});

/// Records a per-attempt outcome for `host`.
pub fn record_attempt(host: &Host, outcome: &str) {
    REQUEST_ATTEMPTS_TOTAL
        .with_label_values(&[&host.to_string(), outcome])
        .inc();
}

/// Records that an attempt is being retried, and why.
pub fn record_retry(reason: &str) {
    REQUEST_RETRIES_TOTAL.with_label_values(&[reason]).inc();
}

/// Records the end-to-end duration of a `perform_request` call.
pub fn record_request_duration(method: &str, seconds: f64) {
    REQUEST_DURATION_SECONDS
        .with_label_values(&[method])
        .observe(seconds);
}

/// Records a node's health transition as observed by the connection pool.
pub fn record_node_health(host: &Host, alive: bool) {
    NODE_HEALTH_STATUS
        .with_label_values(&[&host.to_string()])
        .set(if alive { 1.0 } else { 0.0 });
}

/// Records a node's current consecutive-failure count.
pub fn record_dead_count(host: &Host, dead_count: u32) {
    NODE_DEAD_COUNT
        .with_label_values(&[&host.to_string()])
        .set(dead_count as f64);
}
