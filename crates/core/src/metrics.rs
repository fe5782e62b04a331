//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Sync attempts and their outcomes
//! - Upstream shop API calls (token, order search, proxy)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Sync Metrics
// =============================================================================

/// Sync attempts total by outcome.
pub static SYNC_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shopsync_sync_attempts_total", "Total order sync attempts"),
        &["outcome"], // "processed", "no_new_orders", "up_to_date", "failed"
    )
    .unwrap()
});

/// Orders handed out by processed syncs.
pub static ORDERS_SYNCED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shopsync_orders_synced_total",
        "Total orders returned by processed syncs",
    )
    .unwrap()
});

/// Non-empty batches dropped because their newest order was older than the staleness window.
pub static STALE_BATCHES_DROPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shopsync_stale_batches_dropped_total",
        "Filtered order batches dropped by the second staleness gate",
    )
    .unwrap()
});

// =============================================================================
// Upstream Metrics
// =============================================================================

/// Upstream request duration.
pub static UPSTREAM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shopsync_upstream_duration_seconds",
            "Duration of upstream shop API calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

/// Upstream requests total.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shopsync_upstream_requests_total",
            "Total upstream shop API requests",
        ),
        &["operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record one upstream call.
pub fn record_upstream(operation: &str, success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "error" };
    UPSTREAM_REQUESTS
        .with_label_values(&[operation, status])
        .inc();
    UPSTREAM_DURATION
        .with_label_values(&[operation])
        .observe(duration_secs);
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SYNC_ATTEMPTS.clone()),
        Box::new(ORDERS_SYNCED.clone()),
        Box::new(STALE_BATCHES_DROPPED.clone()),
        Box::new(UPSTREAM_DURATION.clone()),
        Box::new(UPSTREAM_REQUESTS.clone()),
    ]
}
