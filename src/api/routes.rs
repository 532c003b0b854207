//! API route configuration.

use crate::api::handlers::{
    create_handler, health_handler, link_handler, redirect_handler, root_handler, stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `GET  /`               - Service name and version
/// - `GET  /health`         - Health check: DB, cache, click queue
/// - `POST /create`         - Create a short link
/// - `GET  /links/{code}`   - Link record as JSON
/// - `GET  /stats/{code}`   - Click count, creation time, approximate size
/// - `GET  /{code}`         - Redirect to the original URL
///
/// Static segments take precedence over `/{code}`, so aliases matching them
/// are rejected at creation.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/create", post(create_handler))
        .route("/links/{code}", get(link_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/{code}", get(redirect_handler))
}
