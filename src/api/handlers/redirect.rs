//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code through the link service (cache first, then database)
/// 2. The service enqueues a click event for the background worker
/// 3. Return 307 Temporary Redirect
///
/// A full click queue drops the event; the redirect is never delayed by
/// click accounting.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.link_service.resolve_link(&code).await?;
    debug!("Redirecting {} -> {}", code, record.url);

    Ok(Redirect::temporary(&record.url))
}
