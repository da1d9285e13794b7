use clap::Subcommand;
use serde::Serialize;
use tutordesk_core::operations::{
    ClassReportRequest, StudentReportRequest, StudyPlanRequest, SubjectRef, TimetableRequest,
    TutorQuery,
};

use crate::util::{api_request, exit_error, read_json_from_file};

#[derive(Subcommand)]
pub enum OperationCommands {
    /// Ask the AI tutor a question
    Ask {
        #[arg(long)]
        question: String,
    },
    /// Generate a weekly timetable for a class
    Timetable {
        /// Class name (e.g. "10A")
        #[arg(long)]
        class_name: String,
    },
    /// Generate a seven-day study plan
    StudyPlan {
        /// Subject to cover (repeatable, in priority order)
        #[arg(long = "subject")]
        subjects: Vec<String>,
        /// Study hours available per day
        #[arg(long)]
        daily_hours: f64,
    },
    /// Generate a class performance report
    ClassReport {
        #[arg(long)]
        class_name: String,
    },
    /// Generate a student progress report
    StudentReport {
        #[arg(long)]
        student_name: String,
    },
    /// Run any operation by wire name with a raw JSON body
    Run {
        /// Operation name (tutor_query, timetable, study_plan, class_report, student_report)
        operation: String,
        /// JSON body as a string
        #[arg(long, conflicts_with = "data_file")]
        data: Option<String>,
        /// Read the JSON body from a file ('-' for stdin)
        #[arg(long)]
        data_file: Option<String>,
    },
}

pub async fn run(api_url: &str, raw: bool, command: OperationCommands) -> i32 {
    let (path, body) = match command {
        OperationCommands::Ask { question } => {
            ("/v1/tutor/ask".to_string(), to_body(&TutorQuery { question }))
        }
        OperationCommands::Timetable { class_name } => (
            "/v1/timetables".to_string(),
            to_body(&TimetableRequest { class_name }),
        ),
        OperationCommands::StudyPlan {
            subjects,
            daily_hours,
        } => (
            "/v1/study-plans".to_string(),
            to_body(&study_plan_request(subjects, daily_hours)),
        ),
        OperationCommands::ClassReport { class_name } => (
            "/v1/reports/class".to_string(),
            to_body(&ClassReportRequest { class_name }),
        ),
        OperationCommands::StudentReport { student_name } => (
            "/v1/reports/student".to_string(),
            to_body(&StudentReportRequest { student_name }),
        ),
        OperationCommands::Run {
            operation,
            data,
            data_file,
        } => (
            format!("/v1/operations/{operation}"),
            raw_body(data.as_deref(), data_file.as_deref()),
        ),
    };

    api_request(api_url, reqwest::Method::POST, &path, Some(body), raw).await
}

fn study_plan_request(subjects: Vec<String>, daily_hours: f64) -> StudyPlanRequest {
    StudyPlanRequest {
        subjects: subjects
            .into_iter()
            .map(SubjectRef::named)
            .collect(),
        daily_hours,
    }
}

fn to_body<T: Serialize>(input: &T) -> serde_json::Value {
    serde_json::to_value(input)
        .unwrap_or_else(|e| exit_error(&format!("Failed to encode request: {e}"), None))
}

fn raw_body(data: Option<&str>, data_file: Option<&str>) -> serde_json::Value {
    match (data, data_file) {
        (Some(data), _) => serde_json::from_str(data)
            .unwrap_or_else(|e| exit_error(&format!("Invalid JSON in --data: {e}"), None)),
        (None, Some(path)) => read_json_from_file(path).unwrap_or_else(|e| exit_error(&e, None)),
        (None, None) => exit_error(
            "A request body is required",
            Some("Pass --data '<json>' or --data-file <path>."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn study_plan_body_uses_wire_field_names() {
        let body = to_body(&study_plan_request(
            vec!["Maths".to_string(), "Physics".to_string()],
            2.5,
        ));
        assert_eq!(
            body,
            json!({
                "subjects": [{ "name": "Maths" }, { "name": "Physics" }],
                "dailyHours": 2.5
            })
        );
    }

    #[test]
    fn raw_body_prefers_inline_data() {
        let body = raw_body(Some(r#"{"className":"10A"}"#), None);
        assert_eq!(body, json!({ "className": "10A" }));
    }
}
