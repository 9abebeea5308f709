//! Prometheus Metrics
//!
//! Request and domain metrics for the HCMS API, rendered at `GET /metrics`.
//!
//! # Metrics
//!
//! ## Counters
//! - `hcms_http_requests_total` - HTTP requests by method, route, status
//! - `hcms_errors_total` - Error responses by error code
//! - `hcms_ledger_entries_total` - Appended ledger entries by kind code
//!
//! ## Histograms
//! - `hcms_http_request_duration_seconds` - HTTP request duration
//!
//! ## Gauges
//! - `hcms_active_requests` - Requests in flight
//! - `hcms_uptime_seconds` - Service uptime
//!
//! # Configuration
//!
//! - `HCMS_METRICS_ENABLED`: Enable metrics (default: true)

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Instant;

use crate::state::AppState;

/// Route label for requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

/// Metrics configuration
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("HCMS_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        Self { enabled }
    }
}

/// Install the global Prometheus recorder.
///
/// Call once at startup. Returns `None` when metrics are disabled.
pub fn init_metrics(config: &MetricsConfig) -> Result<Option<PrometheusHandle>, String> {
    if !config.enabled {
        tracing::info!("Metrics disabled");
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install metrics recorder: {}", e))?;

    tracing::info!("Metrics initialized");
    Ok(Some(handle))
}

/// Record a finished request
pub fn record_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!("hcms_http_requests_total", &labels).increment(1);
    histogram!("hcms_http_request_duration_seconds", &labels).record(duration_secs);
}

/// Record an error response
pub fn record_error(code: &str) {
    counter!("hcms_errors_total", "code" => code.to_string()).increment(1);
}

/// Record an appended ledger entry
pub fn record_ledger_entry(kind_code: i32) {
    counter!("hcms_ledger_entries_total", "kind" => kind_code.to_string()).increment(1);
}

/// Route template of the request, never the concrete path
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Metrics middleware for tracking HTTP requests
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = route_label(&request);

    gauge!("hcms_active_requests").set(state.begin_request() as f64);
    gauge!("hcms_uptime_seconds").set(state.uptime_secs() as f64);

    let response = next.run(request).await;

    gauge!("hcms_active_requests").set(state.end_request() as f64);
    record_request(
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

/// Render the Prometheus exposition
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
