use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::dataset::FallbackDataset;

/// The five AI-backed request kinds served by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    TutorQuery,
    Timetable,
    StudyPlan,
    ClassReport,
    StudentReport,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::TutorQuery,
        OperationKind::Timetable,
        OperationKind::StudyPlan,
        OperationKind::ClassReport,
        OperationKind::StudentReport,
    ];

    /// Wire name, also used as the provider flow name.
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::TutorQuery => "tutor_query",
            OperationKind::Timetable => "timetable",
            OperationKind::StudyPlan => "study_plan",
            OperationKind::ClassReport => "class_report",
            OperationKind::StudentReport => "student_report",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day names used as timetable keys and study-plan days.
/// Declaration order is week order, so maps keyed by `Weekday` serialize Monday first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

// ──────────────────────────────────────────────
// Inputs
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TutorQuery {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRequest {
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubjectRef {
    /// Missing, null or empty names degrade to the fallback defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Any other caller fields (difficulty, target dates, ...), forwarded to
    /// the provider untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SubjectRef {
    pub fn named(name: impl Into<String>) -> Self {
        SubjectRef {
            name: Some(name.into()),
            extra: BTreeMap::new(),
        }
    }

    /// The subject name, if one was given and is not blank.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    #[serde(default)]
    pub subjects: Vec<SubjectRef>,
    pub daily_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassReportRequest {
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportRequest {
    pub student_name: String,
}

/// Input that passed its operation's schema. Owned by a single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedInput {
    TutorQuery(TutorQuery),
    Timetable(TimetableRequest),
    StudyPlan(StudyPlanRequest),
    ClassReport(ClassReportRequest),
    StudentReport(StudentReportRequest),
}

impl ValidatedInput {
    pub fn kind(&self) -> OperationKind {
        match self {
            ValidatedInput::TutorQuery(_) => OperationKind::TutorQuery,
            ValidatedInput::Timetable(_) => OperationKind::Timetable,
            ValidatedInput::StudyPlan(_) => OperationKind::StudyPlan,
            ValidatedInput::ClassReport(_) => OperationKind::ClassReport,
            ValidatedInput::StudentReport(_) => OperationKind::StudentReport,
        }
    }

    /// Structured request sent to the provider for this operation.
    ///
    /// Timetable and report payloads are enriched with the roster and
    /// aggregate snapshots held by the dataset.
    pub fn provider_payload(&self, dataset: &FallbackDataset) -> serde_json::Value {
        match self {
            ValidatedInput::TutorQuery(input) => json!({ "question": input.question }),
            ValidatedInput::Timetable(input) => json!({
                "className": input.class_name,
                "teachers": dataset.teachers,
                "constraints": dataset.timetable.constraints,
            }),
            ValidatedInput::StudyPlan(input) => json!({
                "subjects": input.subjects,
                "dailyHours": input.daily_hours,
            }),
            ValidatedInput::ClassReport(input) => json!({
                "className": input.class_name,
                "averageAttendance": dataset.class_performance.average_attendance,
                "subjectsPerformance": dataset.class_performance.subjects_performance,
            }),
            ValidatedInput::StudentReport(input) => json!({
                "studentName": input.student_name,
                "className": dataset.student_snapshot.class_name,
                "grades": dataset.student_snapshot.grades,
                "attendance": dataset.student_snapshot.attendance,
            }),
        }
    }
}

// ──────────────────────────────────────────────
// Outputs
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TutorAnswer {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Period {
    pub time: String,
    pub subject: String,
    /// Empty for lunch and other unstaffed slots
    #[serde(default)]
    pub teacher: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub schedule: BTreeMap<Weekday, Vec<Period>>,
    pub optimization_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudyTask {
    pub subject: String,
    pub duration: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayPlan {
    pub day: Weekday,
    pub tasks: Vec<StudyTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub weekly_plan: Vec<DayPlan>,
    pub prioritization_logic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub attendance_analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GradeEntry {
    pub subject: String,
    pub score: f64,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcademicData {
    pub class_name: String,
    pub attendance: f64,
    pub grades: Vec<GradeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub narrative: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub parent_advice: String,
    pub student_motivation: String,
    pub academic_data: AcademicData,
}

/// Output of any operation. Serialized without a tag so the wire shape is
/// exactly the per-operation output object.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OperationOutput {
    TutorQuery(TutorAnswer),
    Timetable(Timetable),
    StudyPlan(StudyPlan),
    ClassReport(ClassReport),
    StudentReport(StudentReport),
}

impl OperationOutput {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationOutput::TutorQuery(_) => OperationKind::TutorQuery,
            OperationOutput::Timetable(_) => OperationKind::Timetable,
            OperationOutput::StudyPlan(_) => OperationKind::StudyPlan,
            OperationOutput::ClassReport(_) => OperationKind::ClassReport,
            OperationOutput::StudentReport(_) => OperationKind::StudentReport,
        }
    }

    /// Parse a provider response against the output schema of `kind`.
    pub fn parse(kind: OperationKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            OperationKind::TutorQuery => OperationOutput::TutorQuery(serde_json::from_value(value)?),
            OperationKind::Timetable => OperationOutput::Timetable(serde_json::from_value(value)?),
            OperationKind::StudyPlan => OperationOutput::StudyPlan(serde_json::from_value(value)?),
            OperationKind::ClassReport => {
                OperationOutput::ClassReport(serde_json::from_value(value)?)
            }
            OperationKind::StudentReport => {
                OperationOutput::StudentReport(serde_json::from_value(value)?)
            }
        })
    }
}
