//! Handler for reading a link record.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the full record behind a short code.
///
/// `GET /links/{code}`
///
/// Counts as a resolution: a click is recorded when tracking is enabled.
pub async fn link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let record = state.link_service.resolve_link(&code).await?;
    Ok(Json(record.into()))
}
