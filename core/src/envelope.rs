use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{FieldErrors, ValidationFailure};

/// Which path produced a pipeline result.
///
/// Internal code and tests can tell the two apart; the wire envelope cannot.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    ProviderSucceeded(T),
    FallbackUsed(T),
}

impl<T> Outcome<T> {
    pub fn data(&self) -> &T {
        match self {
            Outcome::ProviderSucceeded(data) | Outcome::FallbackUsed(data) => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Outcome::ProviderSucceeded(data) | Outcome::FallbackUsed(data) => data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::FallbackUsed(_))
    }
}

/// Uniform `{success, data|errors, message}` result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ResultEnvelope<T> {
    /// Both paths collapse to the same successful envelope.
    pub fn from_outcome(outcome: Outcome<T>) -> Self {
        ResultEnvelope {
            success: true,
            data: Some(outcome.into_data()),
            errors: None,
            message: None,
        }
    }

    pub fn validation_failed(failure: ValidationFailure) -> Self {
        ResultEnvelope {
            success: false,
            data: None,
            errors: Some(failure.errors),
            message: Some(failure.message),
        }
    }

    /// Unrecoverable failure with no field attribution.
    pub fn failure(message: impl Into<String>) -> Self {
        ResultEnvelope {
            success: false,
            data: None,
            errors: None,
            message: Some(message.into()),
        }
    }
}

impl<T> From<Outcome<T>> for ResultEnvelope<T> {
    fn from(outcome: Outcome<T>) -> Self {
        ResultEnvelope::from_outcome(outcome)
    }
}
