//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`              - Service banner
//! - `GET  /health`        - Health check: DB, cache, click queue
//! - `POST /create`        - Create a short link
//! - `GET  /links/{code}`  - Link record
//! - `GET  /stats/{code}`  - Link statistics
//! - `GET  /{code}`        - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Cross-origin headers and `OPTIONS` preflight answers
//! - **Timeout** - Per-request deadline, answered with `408`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Builds the routes with every middleware except path normalization.
///
/// Dropping a timed-out request future cancels the in-flight cache and
/// database calls it was awaiting.
pub fn build_router(state: AppState, request_timeout: Duration, cors_origins: &[String]) -> Router {
    let mut router = api::routes::routes()
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    if let Some(cors) = cors::layer(cors_origins) {
        router = router.layer(cors);
    }

    router.layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(
    state: AppState,
    request_timeout: Duration,
    cors_origins: &[String],
) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(
        state,
        request_timeout,
        cors_origins,
    ))
}
