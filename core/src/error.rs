use serde::Serialize;
use utoipa::ToSchema;

/// Structured transport-level error.
///
/// Pipeline results never use this type: validation failures and provider
/// outages are reported through [`crate::envelope::ResultEnvelope`]. `ApiError`
/// covers what happens before a request reaches the pipeline (unparseable
/// bodies, rate limits, internal faults).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "rate_limited")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const RATE_LIMITED: &str = "rate_limited";
}
