//! HTTP metrics and the Prometheus exposition endpoint.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Per-request instrumentation: a `http_requests_total` counter and a
/// `http_request_duration_seconds` histogram. The path label is the matched
/// route template, so `/admin/users/:id` stays one series rather than one
/// per user id.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let method = method_label(req.method());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let started = Instant::now();
    let response = next.run(req).await;

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => route.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}

// OPTIONS shows up via CORS preflight; anything else the portal never serves.
fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Counts outbound portal emails by template and outcome.
pub fn record_email_sent(template: &str, success: bool) {
    counter!(
        "portal_emails_total",
        "template" => template.to_string(),
        "outcome" => if success { "sent" } else { "failed" }
    )
    .increment(1);
}

/// Counts expiry reminders produced by the daily sweep.
pub fn record_expiry_reminder(days_remaining: i64) {
    counter!(
        "expiry_reminders_total",
        "days_remaining" => days_remaining.to_string()
    )
    .increment(1);
}

/// GET /metrics in Prometheus text exposition format.
pub async fn metrics_handler() -> Response {
    match RECORDER.get() {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "metrics recorder not installed",
        )
            .into_response(),
    }
}

/// Installs the global Prometheus recorder. Call once at startup, before
/// the first metric is touched.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0])
        .expect("histogram buckets are non-empty")
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if RECORDER.set(handle).is_err() {
        panic!("init_metrics called twice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_labels_are_static() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::DELETE), "DELETE");
        assert_eq!(method_label(&Method::OPTIONS), "OPTIONS");
        assert_eq!(method_label(&Method::TRACE), "OTHER");
    }

    #[test]
    fn exposition_endpoint_errors_before_install() {
        // RECORDER is only populated by init_metrics, which main calls;
        // under test the handler must not panic.
        let response = tokio_test::block_on(metrics_handler());
        assert!(
            response.status() == StatusCode::OK
                || response.status() == StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
