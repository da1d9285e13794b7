//! Custom extractors that convert axum rejections to structured AppError responses.
//!
//! Use `AppJson<T>` as a drop-in replacement for `axum::Json<T>` in handler signatures.
//! Unlike the standard extractor, unreadable bodies produce a JSON `ApiError`
//! instead of axum's default plain-text rejection.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

/// Convert a `JsonRejection` to a structured `AppError::Validation`.
pub fn map_json_rejection(rejection: JsonRejection) -> AppError {
    let docs_hint = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Send the request with `Content-Type: application/json`."
        }
        _ => "Send a JSON object matching the operation's input schema (see /swagger-ui).",
    };

    AppError::Validation {
        message: format!("Invalid request body: {}", rejection.body_text()),
        field: Some("body".to_string()),
        docs_hint: Some(docs_hint.to_string()),
    }
}
