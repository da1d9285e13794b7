//! Static data that seeds the fallback synthesizer and enriches provider payloads.
//!
//! The dataset is read-only for the life of the process. It is built in
//! ([`FallbackDataset::builtin`]) or loaded once from a JSON file, then shared
//! by reference with every pipeline run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::operations::{AcademicData, GradeEntry, Weekday};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read fallback dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("fallback dataset {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("default class '{0}' has no report template")]
    MissingDefaultClass(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    pub subject: String,
}

/// One canned timetable slot. The teacher is resolved from the roster by subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableSlot {
    pub time: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableTemplate {
    /// Scheduling constraint forwarded to the provider
    pub constraints: String,
    pub grid: BTreeMap<Weekday, Vec<TimetableSlot>>,
    pub optimization_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyDayTemplate {
    pub day: Weekday,
    /// Literal subject, used when `subject_index` is unset or the caller's list
    /// has no usable name at that index.
    pub subject: String,
    #[serde(default)]
    pub subject_index: Option<usize>,
    pub duration: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanTemplate {
    pub days: Vec<StudyDayTemplate>,
    pub prioritization_logic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTemplate {
    pub average_attendance: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject: String,
    pub average_score: f64,
    pub pass_percentage: f64,
}

/// Class aggregates sent to the provider with a class report request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPerformance {
    pub average_attendance: f64,
    pub subjects_performance: Vec<SubjectPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReportTemplates {
    pub default_class: String,
    pub classes: BTreeMap<String, ClassTemplate>,
    pub recommendations: Vec<String>,
    /// `{attendance}` is replaced with the template's average attendance
    pub attendance_analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportTemplate {
    /// `{student}` is replaced with the student's name
    pub narrative: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub parent_advice: String,
    pub student_motivation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackDataset {
    pub tutor_answer: String,
    pub teachers: Vec<Teacher>,
    pub timetable: TimetableTemplate,
    pub study_plan: StudyPlanTemplate,
    pub class_reports: ClassReportTemplates,
    pub class_performance: ClassPerformance,
    pub student_report: StudentReportTemplate,
    pub student_snapshot: AcademicData,
}

impl Default for FallbackDataset {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FallbackDataset {
    /// Load a dataset from a JSON file and check it is usable.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset: FallbackDataset =
            serde_json::from_str(&text).map_err(|source| DatasetError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        dataset.check()?;
        Ok(dataset)
    }

    /// The default class must have a template, otherwise unknown classes
    /// would have nothing to fall back to.
    pub fn check(&self) -> Result<(), DatasetError> {
        if !self
            .class_reports
            .classes
            .contains_key(&self.class_reports.default_class)
        {
            return Err(DatasetError::MissingDefaultClass(
                self.class_reports.default_class.clone(),
            ));
        }
        Ok(())
    }

    pub fn teacher_for(&self, subject: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.subject == subject)
    }

    pub fn builtin() -> Self {
        FallbackDataset {
            tutor_answer: "I'm currently in demo mode. To enable real AI responses, please \
                           configure your AI API key. How else can I help you with your \
                           schoolwork today?"
                .to_string(),
            teachers: builtin_roster(),
            timetable: TimetableTemplate {
                constraints: "Ensure core subjects are spread across the week.".to_string(),
                grid: builtin_timetable_grid(),
                optimization_reason: "Optimized using standard academic balance (Demo Mode)."
                    .to_string(),
            },
            study_plan: StudyPlanTemplate {
                days: vec![
                    study_day(Weekday::Monday, "Math", Some(0), "2 hours", "Core Concepts"),
                    study_day(Weekday::Tuesday, "Physics", Some(1), "2 hours", "Problem Solving"),
                    study_day(Weekday::Wednesday, "Math", Some(0), "2 hours", "Advanced Practice"),
                    study_day(Weekday::Thursday, "Physics", Some(1), "2 hours", "Theory Revision"),
                    study_day(Weekday::Friday, "General Review", None, "2 hours", "Weekly Summary"),
                    study_day(Weekday::Saturday, "Mock Test", None, "3 hours", "Time Management"),
                    study_day(Weekday::Sunday, "Relaxation", None, "1 hour", "Mental Prep"),
                ],
                prioritization_logic: "Plan generated based on subject complexity and upcoming \
                                       target dates (Demo Mode)."
                    .to_string(),
            },
            class_reports: ClassReportTemplates {
                default_class: "10A".to_string(),
                classes: BTreeMap::from([(
                    "10A".to_string(),
                    ClassTemplate {
                        average_attendance: 94.0,
                        strengths: strings(&["Math Mastery", "High Participation"]),
                        weaknesses: strings(&["Physics Labs"]),
                        summary: "Class 10A shows exceptional discipline and strong \
                                  mathematical skills."
                            .to_string(),
                    },
                )]),
                recommendations: strings(&[
                    "Increase focus on laboratory practicals.",
                    "Peer-to-peer learning for Physics.",
                    "Extra sessions for weak areas.",
                ]),
                attendance_analysis: "Steady attendance maintained at {attendance}%.".to_string(),
            },
            class_performance: ClassPerformance {
                average_attendance: 90.0,
                subjects_performance: vec![SubjectPerformance {
                    subject: "General".to_string(),
                    average_score: 85.0,
                    pass_percentage: 95.0,
                }],
            },
            student_report: StudentReportTemplate {
                narrative: "{student} is performing consistently well across most subjects. \
                            Dedicated effort is visible in daily tasks."
                    .to_string(),
                strengths: strings(&["Analytical Thinking", "Language Skills"]),
                improvements: strings(&["Time Management", "Deep Revision"]),
                parent_advice: "Encourage consistent study hours and provide a quiet \
                                environment for focus."
                    .to_string(),
                student_motivation: "Your potential is limitless. Keep pushing the boundaries \
                                     of your knowledge!"
                    .to_string(),
            },
            student_snapshot: AcademicData {
                class_name: "10A".to_string(),
                attendance: 95.0,
                grades: vec![GradeEntry {
                    subject: "General".to_string(),
                    score: 85.0,
                    grade: "B".to_string(),
                }],
            },
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_roster() -> Vec<Teacher> {
    [
        ("Mr. Rahul Rathod", "Mathematics"),
        ("Mr. Vinesh Patel", "Physics"),
        ("Mr. Bhavesh Gohil", "English"),
        ("Mr. Mohan Baraiya", "Chemistry"),
        ("Mr. Kirit Mavani", "Art"),
        ("Mr. Vishal Bambhaniya", "Biology"),
    ]
    .into_iter()
    .map(|(name, subject)| Teacher {
        name: name.to_string(),
        subject: subject.to_string(),
    })
    .collect()
}

const PERIOD_TIMES: [&str; 5] = [
    "09:00 - 09:50",
    "10:00 - 10:50",
    "11:00 - 11:50",
    "12:00 - 12:50",
    "13:00 - 13:50",
];

fn builtin_timetable_grid() -> BTreeMap<Weekday, Vec<TimetableSlot>> {
    let days: [(Weekday, [&str; 5]); 5] = [
        (Weekday::Monday, ["Mathematics", "Physics", "English", "Lunch", "Chemistry"]),
        (Weekday::Tuesday, ["Chemistry", "Art", "Biology", "Lunch", "Mathematics"]),
        (Weekday::Wednesday, ["Physics", "English", "Mathematics", "Lunch", "Art"]),
        (Weekday::Thursday, ["Mathematics", "Physics", "Chemistry", "Lunch", "Biology"]),
        (Weekday::Friday, ["English", "Biology", "Mathematics", "Lunch", "Art"]),
    ];

    days.into_iter()
        .map(|(day, subjects)| {
            let slots = PERIOD_TIMES
                .iter()
                .zip(subjects)
                .map(|(time, subject)| TimetableSlot {
                    time: time.to_string(),
                    subject: subject.to_string(),
                })
                .collect();
            (day, slots)
        })
        .collect()
}

fn study_day(
    day: Weekday,
    subject: &str,
    subject_index: Option<usize>,
    duration: &str,
    topic: &str,
) -> StudyDayTemplate {
    StudyDayTemplate {
        day,
        subject: subject.to_string(),
        subject_index,
        duration: duration.to_string(),
        topic: topic.to_string(),
    }
}
