//! Per-operation input schemas.
//!
//! Only the tutoring query carries free text that needs a content rule; the
//! other operations get a shape check (deserialization into their input type).
//! Schemas are looked up by operation, so a deployment can swap one without
//! touching the others.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde::de::DeserializeOwned;
use utoipa::ToSchema;

use crate::operations::{
    ClassReportRequest, OperationKind, StudentReportRequest, StudyPlanRequest, TimetableRequest,
    TutorQuery, ValidatedInput,
};

pub const EMPTY_MESSAGE: &str = "Message cannot be empty.";
pub const INVALID_INPUT: &str = "Invalid request input.";

/// Field name → list of messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationFailure {
    pub errors: FieldErrors,
    pub message: String,
}

pub type SchemaCheck = fn(&serde_json::Value) -> Result<ValidatedInput, FieldErrors>;

#[derive(Clone, Copy)]
pub struct OperationSchema {
    pub check: SchemaCheck,
    /// Summary message reported alongside the field errors
    pub failure_message: &'static str,
}

#[derive(Clone)]
pub struct Validator {
    schemas: HashMap<OperationKind, OperationSchema>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::standard()
    }
}

impl Validator {
    pub fn standard() -> Self {
        let schemas = OperationKind::ALL
            .into_iter()
            .map(|kind| (kind, standard_schema(kind)))
            .collect();
        Validator { schemas }
    }

    pub fn with_schema(mut self, kind: OperationKind, schema: OperationSchema) -> Self {
        self.schemas.insert(kind, schema);
        self
    }

    /// Check raw caller input. Pure: no I/O, no logging.
    pub fn validate(
        &self,
        kind: OperationKind,
        raw: &serde_json::Value,
    ) -> Result<ValidatedInput, ValidationFailure> {
        let schema = self
            .schemas
            .get(&kind)
            .copied()
            .unwrap_or_else(|| standard_schema(kind));

        (schema.check)(raw).map_err(|errors| ValidationFailure {
            errors,
            message: schema.failure_message.to_string(),
        })
    }
}

pub fn standard_schema(kind: OperationKind) -> OperationSchema {
    match kind {
        OperationKind::TutorQuery => OperationSchema {
            check: check_tutor_query,
            failure_message: EMPTY_MESSAGE,
        },
        OperationKind::Timetable => OperationSchema {
            check: |raw| shape::<TimetableRequest>(raw).map(ValidatedInput::Timetable),
            failure_message: INVALID_INPUT,
        },
        OperationKind::StudyPlan => OperationSchema {
            check: |raw| shape::<StudyPlanRequest>(raw).map(ValidatedInput::StudyPlan),
            failure_message: INVALID_INPUT,
        },
        OperationKind::ClassReport => OperationSchema {
            check: |raw| shape::<ClassReportRequest>(raw).map(ValidatedInput::ClassReport),
            failure_message: INVALID_INPUT,
        },
        OperationKind::StudentReport => OperationSchema {
            check: |raw| shape::<StudentReportRequest>(raw).map(ValidatedInput::StudentReport),
            failure_message: INVALID_INPUT,
        },
    }
}

fn check_tutor_query(raw: &serde_json::Value) -> Result<ValidatedInput, FieldErrors> {
    match raw.get("question") {
        Some(serde_json::Value::String(question)) if !question.is_empty() => {
            Ok(ValidatedInput::TutorQuery(TutorQuery {
                question: question.clone(),
            }))
        }
        Some(serde_json::Value::String(_)) => Err(field_error("question", EMPTY_MESSAGE)),
        _ => Err(field_error("question", "Expected a string.")),
    }
}

fn shape<T: DeserializeOwned>(raw: &serde_json::Value) -> Result<T, FieldErrors> {
    serde_json::from_value(raw.clone()).map_err(|err| {
        let message = err.to_string();
        let field = extract_field_from_serde_message(&message).unwrap_or_else(|| "input".to_string());
        field_error(&field, &message)
    })
}

fn field_error(field: &str, message: &str) -> FieldErrors {
    BTreeMap::from([(field.to_string(), vec![message.to_string()])])
}

/// Try to extract a field name from serde's error messages.
fn extract_field_from_serde_message(msg: &str) -> Option<String> {
    for pattern in ["missing field `", "unknown field `"] {
        if let Some(start) = msg.find(pattern) {
            let after = &msg[start + pattern.len()..];
            if let Some(end) = after.find('`') {
                return Some(after[..end].to_string());
            }
        }
    }
    None
}
