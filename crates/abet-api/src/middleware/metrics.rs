//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Domain-level gauges (assessments, courses, outcome scores,
//! audit events) are updated on each `/metrics` scrape (pull model) — see
//! the metrics handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Domain gauges (pull model, updated on /metrics scrape) --
    assessments_total: prometheus::Gauge,
    courses_total: prometheus::Gauge,
    outcome_scores_total: prometheus::Gauge,
    audit_events_total: prometheus::Gauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics").finish_non_exhaustive()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("abet_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "abet_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("abet_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let assessments_total =
            prometheus::Gauge::new("abet_assessments_total", "Total assessment records")
                .expect("metric can be created");
        let courses_total = prometheus::Gauge::new("abet_courses_total", "Total course records")
            .expect("metric can be created");
        let outcome_scores_total = prometheus::Gauge::new(
            "abet_outcome_scores_total",
            "Total outcome score records",
        )
        .expect("metric can be created");
        let audit_events_total =
            prometheus::Gauge::new("abet_audit_events_total", "Total audit trail entries")
                .expect("metric can be created");

        for collector in [
            Box::new(http_requests_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(http_request_duration_seconds.clone()),
            Box::new(http_errors_total.clone()),
            Box::new(assessments_total.clone()),
            Box::new(courses_total.clone()),
            Box::new(outcome_scores_total.clone()),
            Box::new(audit_events_total.clone()),
        ] {
            registry
                .register(collector)
                .expect("collector registers once");
        }

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                assessments_total,
                courses_total,
                outcome_scores_total,
                audit_events_total,
            }),
        }
    }

    /// Record one finished request.
    pub fn record(&self, method: &str, path: &str, status: u16, elapsed_seconds: f64) {
        let status = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(elapsed_seconds);
        if status.starts_with('4') || status.starts_with('5') {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status])
                .inc();
        }
    }

    /// Refresh domain gauges from the record store.
    pub fn refresh_gauges(&self, records: &crate::state::Records) {
        self.inner
            .assessments_total
            .set(records.assessments.read().len() as f64);
        self.inner.courses_total.set(records.courses.read().len() as f64);
        self.inner
            .outcome_scores_total
            .set(records.outcome_scores.read().len() as f64);
        self.inner
            .audit_events_total
            .set(records.audit_events.read().len() as f64);
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(err) = encoder.encode(&self.inner.registry.gather(), &mut buffer) {
            tracing::warn!(error = %err, "metrics encoding failed");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Axum middleware recording per-request metrics.
///
/// The matched route template is used as the path label (not the raw URI)
/// so label cardinality stays bounded.
pub async fn track(
    axum::extract::State(state): axum::extract::State<crate::state::AppState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(req).await;

    state.metrics.record(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}
