//! Handler for link creation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::create::{CreateRequest, CreateResponse};
use crate::application::services::CreateLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /create`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "customAlias": "docs" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "message": "Short link created", "id": "docs" }
/// ```
///
/// # Errors
///
/// - 400 if the URL or alias fails validation
/// - 503 if no randomness is available for code generation
/// - 500 on storage failure
pub async fn create_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> Result<(StatusCode, Json<CreateResponse>), AppError> {
    payload.validate()?;

    let mut request = CreateLink::new(payload.url);
    if let Some(alias) = payload.custom_alias {
        request = request.with_alias(alias);
    }

    let code = state.link_service.create_link(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            message: "Short link created".to_string(),
            id: code,
        }),
    ))
}
