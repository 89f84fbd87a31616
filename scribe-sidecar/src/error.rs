use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No recording is active")]
    NoActiveSession,

    #[error("A recording is already active: {0}")]
    SessionAlreadyActive(String),

    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Recording error: {0}")]
    RecordingError(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Delivery failure between the recorder and the session store. Never surfaced
/// to the user: the recorder logs it and drops the action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("recording session is not active")]
    Inactive,

    #[error("session store is closed")]
    Closed,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NoActiveSession => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::SessionAlreadyActive(_) => (StatusCode::CONFLICT, "Conflict"),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            AppError::RecordingError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Recording Error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error"),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
