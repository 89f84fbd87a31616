use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::error::{AppError, Result};
use crate::models::{GenerateRequest, GenerateResponse};

/// Render a Playwright test from an action log.
pub async fn generate_test(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    if request.file_name.trim().is_empty() {
        return Err(AppError::ValidationError("fileName is required".to_string()));
    }

    let file = state.controller.generate(
        &request.actions,
        &request.file_name,
        request.language,
        request.start_url.as_deref(),
    );

    Ok(Json(GenerateResponse {
        code: file.code,
        file_name: file.file_name,
        content_type: file.content_type,
    }))
}
