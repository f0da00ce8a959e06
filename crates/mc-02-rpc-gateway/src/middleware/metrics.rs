//! Gateway counters, exported as JSON on `GET /metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// RPC gateway metrics
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    // JSON-RPC call counters (protocol level)
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Write calls (matrix_sendRow)
    pub write_requests_total: AtomicU64,

    // Matrix outcomes
    pub rows_accepted: AtomicU64,
    pub rows_rejected: AtomicU64,
    pub queries_served: AtomicU64,
    pub queries_failed: AtomicU64,

    // Batch limit rejections
    pub batch_rejected: AtomicU64,

    // Latency tracking
    pub total_latency_us: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one JSON-RPC call. `success` means no JSON-RPC error object.
    pub fn record_request(&self, success: bool, is_write: bool, latency_us: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        if is_write {
            self.write_requests_total.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a row submission
    pub fn record_row(&self, accepted: bool) {
        if accepted {
            self.rows_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rows_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record the outcome of a query
    pub fn record_query(&self, answered: bool) {
        if answered {
            self.queries_served.fetch_add(1, Ordering::Relaxed);
        } else {
            self.queries_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a batch refused for exceeding the size limit
    pub fn record_batch_rejection(&self) {
        self.batch_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in microseconds
    pub fn average_latency_us(&self) -> f64 {
        let total = self.total_latency_us.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
                "writes": self.write_requests_total.load(Ordering::Relaxed),
                "batch_rejected": self.batch_rejected.load(Ordering::Relaxed),
            },
            "rows": {
                "accepted": self.rows_accepted.load(Ordering::Relaxed),
                "rejected": self.rows_rejected.load(Ordering::Relaxed),
            },
            "queries": {
                "served": self.queries_served.load(Ordering::Relaxed),
                "failed": self.queries_failed.load(Ordering::Relaxed),
            },
            "latency": {
                "average_us": self.average_latency_us(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
    is_write: bool,
}

impl RequestTimer {
    pub fn new(metrics: Arc<GatewayMetrics>, is_write: bool) -> Self {
        Self {
            start: Instant::now(),
            metrics,
            is_write,
        }
    }

    pub fn finish(self, success: bool) {
        let latency_us = self.start.elapsed().as_micros() as u64;
        self.metrics
            .record_request(success, self.is_write, latency_us);
    }
}
