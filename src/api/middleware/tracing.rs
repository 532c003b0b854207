//! HTTP request/response tracing middleware.

use axum::http::{Request, Response};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::{Level, Span};

/// Opens one `INFO` span per request carrying method and path.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::span!(
            Level::INFO,
            "request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Logs status and latency; server errors are raised to `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseLog;

impl<B> OnResponse<B> for ResponseLog {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status();
        let latency_ms = latency.as_millis() as u64;

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), latency_ms, "Response");
        } else {
            tracing::info!(status = status.as_u16(), latency_ms, "Response");
        }
    }
}

/// Creates a tracing middleware for HTTP requests.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST path=/create}: Response status=201 latency_ms=3
/// INFO request{method=GET path=/3EAJyP}: Response status=307 latency_ms=1
/// ```
pub fn layer()
-> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, DefaultOnRequest, ResponseLog> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(ResponseLog)
}
