//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Receipts recorded and older balances settled by carry-forward
//! - Zero-mark rows created by marks provisioning

use once_cell::sync::Lazy;
use prometheus::{
    Counter, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace("school_admin"),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace("school_admin")
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Receipts recorded
pub static RECEIPTS_RECORDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("receipts_recorded_total", "Fee receipts recorded").namespace("school_admin"),
    )
    .expect("Failed to create RECEIPTS_RECORDED_TOTAL metric")
});

/// Money applied to older balances by carry-forward
pub static FEES_SETTLED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    Counter::with_opts(
        Opts::new(
            "fees_settled_total",
            "Amount of older receipt balances cleared by new deposits",
        )
        .namespace("school_admin"),
    )
    .expect("Failed to create FEES_SETTLED_TOTAL metric")
});

/// Zero-mark placeholder rows inserted
pub static MARK_ROWS_PROVISIONED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "mark_rows_provisioned_total",
            "Zero-mark rows created for students viewing an exam",
        )
        .namespace("school_admin"),
    )
    .expect("Failed to create MARK_ROWS_PROVISIONED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(RECEIPTS_RECORDED_TOTAL.clone()))
        .expect("Failed to register RECEIPTS_RECORDED_TOTAL");
    registry
        .register(Box::new(FEES_SETTLED_TOTAL.clone()))
        .expect("Failed to register FEES_SETTLED_TOTAL");
    registry
        .register(Box::new(MARK_ROWS_PROVISIONED_TOTAL.clone()))
        .expect("Failed to register MARK_ROWS_PROVISIONED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record a receipt and the amount it settled
pub fn record_receipt(settled: f64) {
    RECEIPTS_RECORDED_TOTAL.inc();
    if settled > 0.0 {
        FEES_SETTLED_TOTAL.inc_by(settled);
    }
}

/// Helper to record provisioned mark rows
pub fn record_mark_rows_provisioned(rows: u64) {
    MARK_ROWS_PROVISIONED_TOTAL.inc_by(rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let _ = &*REGISTRY;
        let _ = &*HTTP_REQUESTS_TOTAL;
        let _ = &*RECEIPTS_RECORDED_TOTAL;
        let _ = &*MARK_ROWS_PROVISIONED_TOTAL;
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/health", 200, 0.001);
        let metrics = gather_metrics();
        assert!(metrics.contains("school_admin_http_requests_total"));
    }

    #[test]
    fn test_record_receipt_counts_settled_amount() {
        let before = FEES_SETTLED_TOTAL.get();
        record_receipt(200.0);
        assert!(FEES_SETTLED_TOTAL.get() >= before + 200.0);
        assert!(gather_metrics().contains("school_admin_receipts_recorded_total"));
    }
}
