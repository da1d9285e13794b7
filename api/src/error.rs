use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tutordesk_core::error::{self, ApiError};

/// Transport-level failures that happen before the pipeline runs.
#[derive(Debug)]
pub enum AppError {
    /// Request body could not be read as JSON (400)
    Validation {
        message: String,
        field: Option<String>,
        docs_hint: Option<String>,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    request_id,
                    docs_hint,
                },
            ),
        };

        (status, Json(api_error)).into_response()
    }
}
