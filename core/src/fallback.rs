//! Deterministic substitutes for provider output.
//!
//! Every routine here is total over well-typed input: no I/O, no panics, and
//! the output always matches the schema the provider would have returned.

use std::collections::BTreeMap;

use crate::dataset::FallbackDataset;
use crate::operations::{
    ClassReport, ClassReportRequest, DayPlan, OperationOutput, Period, StudentReport,
    StudentReportRequest, StudyPlan, StudyPlanRequest, StudyTask, SubjectRef, Timetable,
    TutorAnswer, ValidatedInput,
};

#[derive(Debug, Clone, Copy)]
pub struct FallbackSynthesizer<'a> {
    dataset: &'a FallbackDataset,
}

impl<'a> FallbackSynthesizer<'a> {
    pub fn new(dataset: &'a FallbackDataset) -> Self {
        FallbackSynthesizer { dataset }
    }

    pub fn synthesize(&self, input: &ValidatedInput) -> OperationOutput {
        match input {
            ValidatedInput::TutorQuery(_) => OperationOutput::TutorQuery(self.tutor_answer()),
            ValidatedInput::Timetable(_) => OperationOutput::Timetable(self.timetable()),
            ValidatedInput::StudyPlan(request) => {
                OperationOutput::StudyPlan(self.study_plan(request))
            }
            ValidatedInput::ClassReport(request) => {
                OperationOutput::ClassReport(self.class_report(request))
            }
            ValidatedInput::StudentReport(request) => {
                OperationOutput::StudentReport(self.student_report(request))
            }
        }
    }

    /// Independent of the question asked.
    pub fn tutor_answer(&self) -> TutorAnswer {
        TutorAnswer {
            answer: self.dataset.tutor_answer.clone(),
        }
    }

    /// Canned week; the class name does not change the schedule.
    pub fn timetable(&self) -> Timetable {
        let schedule = self
            .dataset
            .timetable
            .grid
            .iter()
            .map(|(day, slots)| {
                let periods = slots
                    .iter()
                    .map(|slot| Period {
                        time: slot.time.clone(),
                        subject: slot.subject.clone(),
                        teacher: self
                            .dataset
                            .teacher_for(&slot.subject)
                            .map(|t| t.name.clone())
                            .unwrap_or_default(),
                    })
                    .collect();
                (*day, periods)
            })
            .collect::<BTreeMap<_, _>>();

        Timetable {
            schedule,
            optimization_reason: self.dataset.timetable.optimization_reason.clone(),
        }
    }

    pub fn study_plan(&self, request: &StudyPlanRequest) -> StudyPlan {
        let weekly_plan = self
            .dataset
            .study_plan
            .days
            .iter()
            .map(|template| {
                let subject = template
                    .subject_index
                    .and_then(|idx| request.subjects.get(idx))
                    .and_then(SubjectRef::label)
                    .unwrap_or(template.subject.as_str());

                DayPlan {
                    day: template.day,
                    tasks: vec![StudyTask {
                        subject: subject.to_string(),
                        duration: template.duration.clone(),
                        topic: template.topic.clone(),
                    }],
                }
            })
            .collect();

        StudyPlan {
            weekly_plan,
            prioritization_logic: self.dataset.study_plan.prioritization_logic.clone(),
        }
    }

    /// Unknown classes get the default class's template.
    pub fn class_report(&self, request: &ClassReportRequest) -> ClassReport {
        let reports = &self.dataset.class_reports;
        let template = reports
            .classes
            .get(&request.class_name)
            .or_else(|| reports.classes.get(&reports.default_class))
            .cloned()
            .unwrap_or_default();

        ClassReport {
            summary: template.summary,
            strengths: template.strengths,
            weaknesses: template.weaknesses,
            recommendations: reports.recommendations.clone(),
            attendance_analysis: reports
                .attendance_analysis
                .replace("{attendance}", &template.average_attendance.to_string()),
        }
    }

    pub fn student_report(&self, request: &StudentReportRequest) -> StudentReport {
        let template = &self.dataset.student_report;
        StudentReport {
            narrative: template.narrative.replace("{student}", &request.student_name),
            strengths: template.strengths.clone(),
            improvements: template.improvements.clone(),
            parent_advice: template.parent_advice.clone(),
            student_motivation: template.student_motivation.clone(),
            academic_data: self.dataset.student_snapshot.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{TimetableRequest, TutorQuery, Weekday};

    fn subjects(names: &[&str]) -> Vec<SubjectRef> {
        names
            .iter()
            .map(|name| SubjectRef::named(*name))
            .collect()
    }

    fn first_subject(plan: &StudyPlan, day: usize) -> &str {
        &plan.weekly_plan[day].tasks[0].subject
    }

    #[test]
    fn tutor_answer_ignores_the_question() {
        let dataset = FallbackDataset::builtin();
        let synth = FallbackSynthesizer::new(&dataset);
        let a = synth.synthesize(&ValidatedInput::TutorQuery(TutorQuery {
            question: "What is photosynthesis?".to_string(),
        }));
        let b = synth.synthesize(&ValidatedInput::TutorQuery(TutorQuery {
            question: "help".to_string(),
        }));
        assert_eq!(a, b);
        match a {
            OperationOutput::TutorQuery(answer) => assert!(answer.answer.contains("demo mode")),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn timetable_has_five_weekdays_of_five_periods_with_lunch() {
        let dataset = FallbackDataset::builtin();
        let output = FallbackSynthesizer::new(&dataset).synthesize(&ValidatedInput::Timetable(
            TimetableRequest {
                class_name: "10A".to_string(),
            },
        ));
        let OperationOutput::Timetable(timetable) = output else {
            panic!("timetable expected");
        };

        let days: Vec<Weekday> = timetable.schedule.keys().copied().collect();
        assert_eq!(
            days,
            vec![
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday
            ]
        );
        for periods in timetable.schedule.values() {
            assert_eq!(periods.len(), 5);
            let lunches: Vec<&Period> = periods.iter().filter(|p| p.subject == "Lunch").collect();
            assert_eq!(lunches.len(), 1);
            assert_eq!(lunches[0].teacher, "");
        }
        assert_eq!(
            timetable.schedule[&Weekday::Monday][0],
            Period {
                time: "09:00 - 09:50".to_string(),
                subject: "Mathematics".to_string(),
                teacher: "Mr. Rahul Rathod".to_string(),
            }
        );
    }

    #[test]
    fn study_plan_with_no_subjects_uses_literal_defaults() {
        let dataset = FallbackDataset::builtin();
        let plan = FallbackSynthesizer::new(&dataset).study_plan(&StudyPlanRequest {
            subjects: Vec::new(),
            daily_hours: 2.0,
        });

        assert_eq!(plan.weekly_plan.len(), 7);
        assert!(plan.weekly_plan.iter().all(|day| day.tasks.len() == 1));
        assert_eq!(first_subject(&plan, 0), "Math");
        assert_eq!(first_subject(&plan, 1), "Physics");
        assert_eq!(plan.weekly_plan[6].day, Weekday::Sunday);
    }

    #[test]
    fn study_plan_uses_caller_subjects_when_present() {
        let dataset = FallbackDataset::builtin();
        let synth = FallbackSynthesizer::new(&dataset);

        let plan = synth.study_plan(&StudyPlanRequest {
            subjects: subjects(&["Chemistry", "Biology", "History"]),
            daily_hours: 3.0,
        });
        assert_eq!(first_subject(&plan, 0), "Chemistry");
        assert_eq!(first_subject(&plan, 1), "Biology");
        assert_eq!(first_subject(&plan, 2), "Chemistry");
        assert_eq!(first_subject(&plan, 3), "Biology");
        assert_eq!(first_subject(&plan, 4), "General Review");
    }

    #[test]
    fn study_plan_short_or_blank_lists_degrade_per_entry() {
        let dataset = FallbackDataset::builtin();
        let synth = FallbackSynthesizer::new(&dataset);

        let plan = synth.study_plan(&StudyPlanRequest {
            subjects: subjects(&["English"]),
            daily_hours: 1.0,
        });
        assert_eq!(first_subject(&plan, 0), "English");
        assert_eq!(first_subject(&plan, 1), "Physics");

        let plan = synth.study_plan(&StudyPlanRequest {
            subjects: subjects(&["", "Art"]),
            daily_hours: 1.0,
        });
        assert_eq!(first_subject(&plan, 0), "Math");
        assert_eq!(first_subject(&plan, 1), "Art");
    }

    #[test]
    fn null_subject_names_degrade_like_missing_ones() {
        let dataset = FallbackDataset::builtin();
        let request: StudyPlanRequest = serde_json::from_value(serde_json::json!({
            "subjects": [{ "name": null }, { "difficulty": "easy" }],
            "dailyHours": 2
        }))
        .expect("null and missing names should parse");

        let plan = FallbackSynthesizer::new(&dataset).study_plan(&request);
        assert_eq!(first_subject(&plan, 0), "Math");
        assert_eq!(first_subject(&plan, 1), "Physics");
    }

    #[test]
    fn unknown_class_gets_the_default_template() {
        let dataset = FallbackDataset::builtin();
        let synth = FallbackSynthesizer::new(&dataset);

        let unknown = synth.class_report(&ClassReportRequest {
            class_name: "9B".to_string(),
        });
        let default = synth.class_report(&ClassReportRequest {
            class_name: "10A".to_string(),
        });
        assert_eq!(unknown, default);
        assert_eq!(default.attendance_analysis, "Steady attendance maintained at 94%.");
        assert_eq!(default.recommendations.len(), 3);
    }

    #[test]
    fn class_report_survives_a_dataset_without_templates() {
        let mut dataset = FallbackDataset::builtin();
        dataset.class_reports.classes.clear();
        let report = FallbackSynthesizer::new(&dataset).class_report(&ClassReportRequest {
            class_name: "9B".to_string(),
        });
        assert!(report.strengths.is_empty());
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn student_report_interpolates_only_the_name() {
        let dataset = FallbackDataset::builtin();
        let report = FallbackSynthesizer::new(&dataset).student_report(&StudentReportRequest {
            student_name: "Priya".to_string(),
        });

        assert!(report.narrative.starts_with("Priya is performing consistently well"));
        assert_eq!(report.academic_data.class_name, "10A");
        assert_eq!(report.academic_data.attendance, 95.0);
        assert_eq!(report.academic_data.grades[0].grade, "B");
    }

    #[test]
    fn student_report_accepts_an_empty_name() {
        let dataset = FallbackDataset::builtin();
        let report = FallbackSynthesizer::new(&dataset).student_report(&StudentReportRequest {
            student_name: String::new(),
        });
        assert!(report.narrative.starts_with(" is performing"));
    }

    #[test]
    fn fallback_output_kind_matches_input_kind() {
        let dataset = FallbackDataset::builtin();
        let synth = FallbackSynthesizer::new(&dataset);
        let inputs = [
            ValidatedInput::TutorQuery(TutorQuery {
                question: "q".to_string(),
            }),
            ValidatedInput::Timetable(TimetableRequest {
                class_name: String::new(),
            }),
            ValidatedInput::StudyPlan(StudyPlanRequest {
                subjects: Vec::new(),
                daily_hours: 0.0,
            }),
            ValidatedInput::ClassReport(ClassReportRequest {
                class_name: String::new(),
            }),
            ValidatedInput::StudentReport(StudentReportRequest {
                student_name: String::new(),
            }),
        ];

        for input in &inputs {
            let output = synth.synthesize(input);
            assert_eq!(output.kind(), input.kind());

            // The fallback must parse back through the provider's output schema.
            let value = serde_json::to_value(&output).expect("fallback should serialize");
            let reparsed = OperationOutput::parse(input.kind(), value)
                .expect("fallback must satisfy the provider output schema");
            assert_eq!(reparsed, output);
        }
    }
}
