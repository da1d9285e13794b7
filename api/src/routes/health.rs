use axum::extract::State;
use axum::{Json, Router, routing::get};

use crate::HealthResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint. Reports provider configuration and how many
/// responses were served from fallback data since startup
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_configured = state.pipeline.provider_configured();

    Json(HealthResponse {
        status: if provider_configured { "ok" } else { "demo" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider_configured,
        fallback_responses: state.pipeline.stats().snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;
    use tutordesk_core::dataset::FallbackDataset;
    use tutordesk_core::operations::OperationKind;

    use crate::pipeline::Pipeline;
    use crate::provider::UnconfiguredProvider;
    use crate::state::AppState;

    #[tokio::test]
    async fn health_reports_demo_mode_and_fallback_counts() {
        let pipeline = Arc::new(Pipeline::new(
            Arc::new(UnconfiguredProvider),
            Arc::new(FallbackDataset::builtin()),
        ));
        pipeline
            .run(OperationKind::StudentReport, &json!({ "studentName": "Kavya" }))
            .await;

        let app = super::router().with_state(AppState { pipeline });
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["status"], "demo");
        assert_eq!(body["providerConfigured"], false);
        assert_eq!(body["fallbackResponses"]["student_report"], 1);
        assert_eq!(body["fallbackResponses"]["timetable"], 0);
    }
}
