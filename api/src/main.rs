use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod error;
mod extract;
mod middleware;
mod pipeline;
mod provider;
mod routes;
mod state;

use tutordesk_core::envelope::ResultEnvelope;
use tutordesk_core::operations as ops;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TutorDesk API",
        version = "0.1.0",
        description = "AI-backed tutoring, planning and reporting for the school dashboard. Every operation answers with usable data, even when the AI provider is down."
    ),
    paths(
        routes::health::health_check,
        routes::operations::ask_tutor,
        routes::operations::generate_timetable,
        routes::operations::generate_study_plan,
        routes::operations::generate_class_report,
        routes::operations::generate_student_report,
        routes::operations::run_operation,
    ),
    components(schemas(
        HealthResponse,
        tutordesk_core::error::ApiError,
        tutordesk_core::validation::ValidationFailure,
        ops::TutorQuery,
        ops::TutorAnswer,
        ops::TimetableRequest,
        ops::Weekday,
        ops::Period,
        ops::Timetable,
        ops::SubjectRef,
        ops::StudyPlanRequest,
        ops::StudyTask,
        ops::DayPlan,
        ops::StudyPlan,
        ops::ClassReportRequest,
        ops::ClassReport,
        ops::StudentReportRequest,
        ops::GradeEntry,
        ops::AcademicData,
        ops::StudentReport,
        ops::OperationOutput,
        ResultEnvelope<ops::TutorAnswer>,
        ResultEnvelope<ops::Timetable>,
        ResultEnvelope<ops::StudyPlan>,
        ResultEnvelope<ops::ClassReport>,
        ResultEnvelope<ops::StudentReport>,
        ResultEnvelope<ops::OperationOutput>,
    ))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` with a configured provider, `demo` when every answer comes from fallback data
    pub status: String,
    pub version: String,
    pub provider_configured: bool,
    /// Responses served from fallback data since startup, per operation
    pub fallback_responses: BTreeMap<String, u64>,
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutordesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let provider_config =
        state::ProviderConfig::from_env().expect("Invalid AI provider configuration");
    let dataset = state::load_dataset().expect("Failed to load fallback dataset");
    let provider =
        provider::build_provider(provider_config).expect("Failed to build AI provider client");
    if !provider.is_configured() {
        tracing::warn!(
            "TUTORDESK_AI_BASE_URL or TUTORDESK_AI_API_KEY not set, serving fallback data only"
        );
    }

    let app_state = state::AppState {
        pipeline: Arc::new(pipeline::Pipeline::new(provider, Arc::new(dataset))),
    };

    // CORS
    let cors_layer = middleware::cors::build_cors_layer();

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::operations::router().layer(middleware::rate_limit::operations_layer()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("TutorDesk API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
