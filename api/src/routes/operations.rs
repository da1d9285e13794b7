use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tutordesk_core::envelope::ResultEnvelope;
use tutordesk_core::error::ApiError;
use tutordesk_core::operations::{
    ClassReport, ClassReportRequest, OperationKind, OperationOutput, StudentReport,
    StudentReportRequest, StudyPlan, StudyPlanRequest, Timetable, TimetableRequest, TutorAnswer,
    TutorQuery,
};

use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tutor/ask", post(ask_tutor))
        .route("/v1/timetables", post(generate_timetable))
        .route("/v1/study-plans", post(generate_study_plan))
        .route("/v1/reports/class", post(generate_class_report))
        .route("/v1/reports/student", post(generate_student_report))
        .route("/v1/operations/{operation}", post(run_operation))
}

type EnvelopeResponse = (StatusCode, Json<ResultEnvelope<OperationOutput>>);

async fn respond(state: &AppState, kind: OperationKind, raw: serde_json::Value) -> EnvelopeResponse {
    let envelope = state.pipeline.run(kind, &raw).await;
    let status = if envelope.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(envelope))
}

/// Answer a student's question
///
/// Always returns an answer: when the AI provider is unavailable the answer
/// is a fixed demo-mode message.
#[utoipa::path(
    post,
    path = "/v1/tutor/ask",
    request_body = TutorQuery,
    responses(
        (status = 200, description = "Answer", body = ResultEnvelope<TutorAnswer>),
        (status = 400, description = "Empty question", body = ResultEnvelope<TutorAnswer>),
        (status = 429, description = "Rate limited", body = ApiError)
    ),
    tag = "tutor"
)]
pub async fn ask_tutor(
    State(state): State<AppState>,
    AppJson(raw): AppJson<serde_json::Value>,
) -> EnvelopeResponse {
    respond(&state, OperationKind::TutorQuery, raw).await
}

/// Generate a weekly timetable for a class
#[utoipa::path(
    post,
    path = "/v1/timetables",
    request_body = TimetableRequest,
    responses(
        (status = 200, description = "Monday to Friday schedule", body = ResultEnvelope<Timetable>),
        (status = 400, description = "Validation failed", body = ResultEnvelope<Timetable>),
        (status = 429, description = "Rate limited", body = ApiError)
    ),
    tag = "planning"
)]
pub async fn generate_timetable(
    State(state): State<AppState>,
    AppJson(raw): AppJson<serde_json::Value>,
) -> EnvelopeResponse {
    respond(&state, OperationKind::Timetable, raw).await
}

/// Generate a seven-day study plan from a subject list and daily hour budget
#[utoipa::path(
    post,
    path = "/v1/study-plans",
    request_body = StudyPlanRequest,
    responses(
        (status = 200, description = "Weekly plan", body = ResultEnvelope<StudyPlan>),
        (status = 400, description = "Validation failed", body = ResultEnvelope<StudyPlan>),
        (status = 429, description = "Rate limited", body = ApiError)
    ),
    tag = "planning"
)]
pub async fn generate_study_plan(
    State(state): State<AppState>,
    AppJson(raw): AppJson<serde_json::Value>,
) -> EnvelopeResponse {
    respond(&state, OperationKind::StudyPlan, raw).await
}

/// Generate a class performance report
#[utoipa::path(
    post,
    path = "/v1/reports/class",
    request_body = ClassReportRequest,
    responses(
        (status = 200, description = "Class report", body = ResultEnvelope<ClassReport>),
        (status = 400, description = "Validation failed", body = ResultEnvelope<ClassReport>),
        (status = 429, description = "Rate limited", body = ApiError)
    ),
    tag = "reports"
)]
pub async fn generate_class_report(
    State(state): State<AppState>,
    AppJson(raw): AppJson<serde_json::Value>,
) -> EnvelopeResponse {
    respond(&state, OperationKind::ClassReport, raw).await
}

/// Generate a student progress report
#[utoipa::path(
    post,
    path = "/v1/reports/student",
    request_body = StudentReportRequest,
    responses(
        (status = 200, description = "Student report", body = ResultEnvelope<StudentReport>),
        (status = 400, description = "Validation failed", body = ResultEnvelope<StudentReport>),
        (status = 429, description = "Rate limited", body = ApiError)
    ),
    tag = "reports"
)]
pub async fn generate_student_report(
    State(state): State<AppState>,
    AppJson(raw): AppJson<serde_json::Value>,
) -> EnvelopeResponse {
    respond(&state, OperationKind::StudentReport, raw).await
}

/// Run any operation by wire name
///
/// `operation` is one of `tutor_query`, `timetable`, `study_plan`,
/// `class_report`, `student_report`.
#[utoipa::path(
    post,
    path = "/v1/operations/{operation}",
    params(("operation" = String, Path, description = "Operation wire name")),
    responses(
        (status = 200, description = "Operation output", body = ResultEnvelope<OperationOutput>),
        (status = 400, description = "Validation failed", body = ResultEnvelope<OperationOutput>),
        (status = 404, description = "Unknown operation", body = ResultEnvelope<OperationOutput>),
        (status = 429, description = "Rate limited", body = ApiError)
    ),
    tag = "operations"
)]
pub async fn run_operation(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    AppJson(raw): AppJson<serde_json::Value>,
) -> EnvelopeResponse {
    match OperationKind::from_name(&operation) {
        Some(kind) => respond(&state, kind, raw).await,
        None => (
            StatusCode::NOT_FOUND,
            Json(ResultEnvelope::failure(format!(
                "Unknown operation '{operation}'."
            ))),
        ),
    }
}
