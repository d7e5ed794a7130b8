//! # Store → Engine Bridges
//!
//! The one place where records are fetched and handed to the engine. Route
//! handlers call these functions and serialize the results — no scoring or
//! aggregation logic lives in a handler, and nothing else calls the engine
//! directly, so every endpoint reports the same numbers for the same data.
//!
//! ## Fail-Soft Boundary
//!
//! [`assessment_score`] is the per-assessment fault boundary for batch
//! aggregation: an unknown id zero-fills with a warning instead of
//! erroring, so one dangling reference cannot take down a dashboard that
//! spans many assessments. Malformed component data (out-of-scale rubric
//! scores, negative weights) is unrepresentable in `abet_core` types, so
//! the unknown-id case is the whole remaining fault class.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use abet_engine::{
    aggregate, compliance, outcomes, score, ComplianceMetric, CourseSummary, MethodsDashboard,
    OutcomeAggregate, ProgramAverage, ScoreResult,
};

use crate::state::AppState;

/// Score one assessment from its current components.
///
/// The single scoring code path. Deterministic and idempotent: unchanged
/// records give identical results. Unknown ids zero-fill.
pub fn assessment_score(state: &AppState, assessment_id: Uuid) -> ScoreResult {
    if !state
        .records
        .assessments
        .read()
        .contains_key(&assessment_id)
    {
        tracing::warn!(assessment = %assessment_id, "scoring unknown assessment, zero-filling");
        return ScoreResult::zeroed();
    }

    let (ci, ap, outcome_scores) = state.records.components_of(assessment_id);
    score::score_components(&ci, &ap, &outcome_scores)
}

/// Composite scores for every assessment in the system, in id order.
fn all_composite_scores(state: &AppState) -> Vec<f64> {
    let ids: Vec<Uuid> = state.records.assessments.read().keys().copied().collect();
    ids.iter()
        .map(|&id| assessment_score(state, id).composite_score)
        .collect()
}

/// Composite scores for every assessment of one course.
fn course_composite_scores(state: &AppState, course_id: Uuid) -> Vec<f64> {
    state
        .records
        .assessments_of_course(course_id)
        .into_iter()
        .map(|id| assessment_score(state, id).composite_score)
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard statistics
// ---------------------------------------------------------------------------

/// Institution-wide entity counts plus the average assessment score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub departments: usize,
    pub programs: usize,
    pub courses: usize,
    pub assessments: usize,
    /// Mean composite score across every assessment, two decimals.
    pub average_score: f64,
}

/// Compute the dashboard statistics snapshot.
pub fn dashboard_stats(state: &AppState) -> DashboardStats {
    let scores = all_composite_scores(state);
    let average = aggregate::mean_composite(&scores);
    DashboardStats {
        departments: state.records.departments.read().len(),
        programs: state.records.programs.read().len(),
        courses: state.records.courses.read().len(),
        assessments: scores.len(),
        average_score: (average * 100.0).round() / 100.0,
    }
}

// ---------------------------------------------------------------------------
// Program averages
// ---------------------------------------------------------------------------

/// A program's rollup, labeled for the all-programs listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgramAverageEntry {
    pub program_id: Uuid,
    pub program_name: String,
    pub average_score: f64,
    pub is_accredited: bool,
    pub assessment_count: usize,
}

/// Average over every assessment of every course under one program.
///
/// `None` when the program id itself is unknown — missing top-level
/// entities are the caller's 404, not a zero-fill.
pub fn program_average(state: &AppState, program_id: Uuid) -> Option<ProgramAverage> {
    if !state.records.programs.read().contains_key(&program_id) {
        return None;
    }
    let scores: Vec<f64> = state
        .records
        .courses_of_program(program_id)
        .into_iter()
        .flat_map(|course_id| course_composite_scores(state, course_id))
        .collect();
    Some(ProgramAverage::from_scores(&scores))
}

/// Rollups for every program, in id order.
pub fn all_program_averages(state: &AppState) -> Vec<ProgramAverageEntry> {
    let programs: Vec<(Uuid, String)> = state
        .records
        .programs
        .read()
        .values()
        .map(|p| (p.id, p.name.clone()))
        .collect();

    programs
        .into_iter()
        .filter_map(|(id, name)| {
            program_average(state, id).map(|avg| ProgramAverageEntry {
                program_id: id,
                program_name: name,
                average_score: avg.average_score,
                is_accredited: avg.is_accredited,
                assessment_count: avg.assessment_count,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Course summaries
// ---------------------------------------------------------------------------

/// Assessment summaries for every course, in id order.
pub fn course_summaries(state: &AppState) -> Vec<CourseSummary> {
    let courses: Vec<abet_core::Course> =
        state.records.courses.read().values().cloned().collect();
    let catalog_size = state.records.abet_outcomes.read().len();

    courses
        .iter()
        .map(|course| {
            let scores = course_composite_scores(state, course.id);
            let evidence = state.records.evidence_for_course(course.id);
            let enrollment = state.records.enrollment_count(course.id);
            aggregate::summarize_course(course, enrollment, &scores, &evidence, catalog_size)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Outcome dashboard
// ---------------------------------------------------------------------------

/// Catalog-outcome aggregates, in label order.
pub fn outcomes_dashboard(state: &AppState) -> Vec<OutcomeAggregate> {
    let catalog: Vec<abet_core::AbetOutcome> =
        state.records.abet_outcomes.read().values().cloned().collect();

    let mut rows: Vec<OutcomeAggregate> = catalog
        .iter()
        .map(|outcome| {
            let scores = state.records.scores_for_outcome(outcome.id);
            outcomes::aggregate_outcome(outcome, &scores)
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));
    rows
}

// ---------------------------------------------------------------------------
// Compliance dashboards
// ---------------------------------------------------------------------------

/// The four institutional compliance metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceDashboard {
    pub course_syllabi: ComplianceMetric,
    pub assessment_data: ComplianceMetric,
    pub student_outcomes: ComplianceMetric,
    pub faculty_training: ComplianceMetric,
}

/// Compute the four institutional KPIs for the configured academic year.
pub fn compliance_dashboard(state: &AppState) -> ComplianceDashboard {
    let year = &state.config.academic_year;

    let course_syllabi = compliance::syllabi_metric(
        state.records.updated_syllabi_count(year),
        state.records.courses.read().len(),
    );

    let assessment_data = compliance::assessment_data_metric(&all_composite_scores(state));

    let met = outcomes_dashboard(state)
        .iter()
        .filter(|row| row.percentage >= outcomes::OUTCOME_MET_THRESHOLD)
        .count();
    let student_outcomes =
        compliance::outcomes_met_metric(met, state.records.abet_outcomes.read().len());

    let faculty_training = compliance::faculty_training_metric(
        state.records.trained_faculty_count(year),
        state.records.faculty.read().len(),
    );

    ComplianceDashboard {
        course_syllabi,
        assessment_data,
        student_outcomes,
        faculty_training,
    }
}

/// Per-method compliance for the configured semester.
pub fn methods_dashboard(state: &AppState) -> MethodsDashboard {
    let semester = &state.config.semester;
    let summaries: Vec<_> = state
        .records
        .active_methods()
        .iter()
        .map(|method| {
            let records = state.records.method_records_for(method.id, semester);
            compliance::summarize_method(method, &records)
        })
        .collect();
    compliance::methods_dashboard(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abet_core::{
        AbetOutcome, AcademicPerformance, Assessment, Course, EvidenceType, LearningOutcome,
        OutcomeScore, Program, RubricScore,
    };
    use chrono::Utc;

    fn state_with_program() -> (AppState, Uuid, Uuid) {
        let state = AppState::new();
        let program = Program {
            id: Uuid::new_v4(),
            name: "Mechanical Engineering".into(),
            description: "BSME".into(),
            department_id: Uuid::new_v4(),
        };
        let course = Course {
            id: Uuid::new_v4(),
            name: "Statics".into(),
            description: "Forces in equilibrium".into(),
            credits: 3,
            program_id: program.id,
            instructor: None,
        };
        let (program_id, course_id) = (program.id, course.id);
        state.records.programs.write().insert(program.id, program);
        state.records.courses.write().insert(course.id, course);
        (state, program_id, course_id)
    }

    fn add_assessment_with_grades(state: &AppState, course_id: Uuid, grades: &[(u8, u32)]) -> Uuid {
        let assessment = Assessment::new(
            "Scored work",
            chrono::NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
            course_id,
            Utc::now(),
        )
        .unwrap();
        let id = assessment.id;
        state.records.assessments.write().insert(id, assessment);
        for &(grade, weight) in grades {
            let ap = AcademicPerformance {
                id: Uuid::new_v4(),
                assessment_id: id,
                grade,
                weight,
                performance_type: "exam".into(),
            };
            state.records.academic_performances.write().insert(ap.id, ap);
        }
        id
    }

    #[test]
    fn unknown_assessment_zero_fills() {
        let state = AppState::new();
        let result = assessment_score(&state, Uuid::new_v4());
        assert_eq!(result, ScoreResult::zeroed());
    }

    #[test]
    fn assessment_score_matches_weighted_average() {
        let (state, _, course_id) = state_with_program();
        let id = add_assessment_with_grades(&state, course_id, &[(80, 40), (90, 60)]);
        let result = assessment_score(&state, id);
        assert_eq!(result.composite_score, 86.0);
        assert!(!result.is_accredited);
    }

    #[test]
    fn scoring_twice_is_identical() {
        let (state, _, course_id) = state_with_program();
        let id = add_assessment_with_grades(&state, course_id, &[(73, 3), (91, 7)]);
        assert_eq!(assessment_score(&state, id), assessment_score(&state, id));
    }

    #[test]
    fn program_average_unknown_program_is_none() {
        let state = AppState::new();
        assert!(program_average(&state, Uuid::new_v4()).is_none());
    }

    #[test]
    fn program_average_spans_courses() {
        let (state, program_id, course_id) = state_with_program();
        add_assessment_with_grades(&state, course_id, &[(80, 1)]);
        add_assessment_with_grades(&state, course_id, &[(100, 1)]);

        let avg = program_average(&state, program_id).unwrap();
        assert_eq!(avg.average_score, 90.0);
        assert!(avg.is_accredited);
        assert_eq!(avg.assessment_count, 2);
    }

    #[test]
    fn program_with_no_assessments_averages_zero() {
        let (state, program_id, _) = state_with_program();
        let avg = program_average(&state, program_id).unwrap();
        assert_eq!(avg.average_score, 0.0);
        assert!(!avg.is_accredited);
    }

    #[test]
    fn dashboard_stats_counts_and_average() {
        let (state, _, course_id) = state_with_program();
        add_assessment_with_grades(&state, course_id, &[(85, 1)]);
        let stats = dashboard_stats(&state);
        assert_eq!(stats.programs, 1);
        assert_eq!(stats.courses, 1);
        assert_eq!(stats.assessments, 1);
        assert_eq!(stats.average_score, 85.0);
    }

    #[test]
    fn outcomes_dashboard_sorted_by_label() {
        let state = AppState::new();
        for outcome in AbetOutcome::standard_catalog() {
            state.records.abet_outcomes.write().insert(outcome.id, outcome);
        }
        let rows = outcomes_dashboard(&state);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].label, "SO1");
        assert!(rows.iter().all(|r| r.percentage == 0.0));
    }

    #[test]
    fn compliance_dashboard_counts_met_outcomes() {
        let (state, _, course_id) = state_with_program();
        let assessment_id = add_assessment_with_grades(&state, course_id, &[(90, 1)]);

        let outcome = AbetOutcome::new("SO1", "problem solving");
        let outcome_id = outcome.id;
        state.records.abet_outcomes.write().insert(outcome.id, outcome);

        let lo = LearningOutcome {
            id: Uuid::new_v4(),
            assessment_id,
            description: "free-body diagrams".into(),
        };
        state.records.learning_outcomes.write().insert(lo.id, lo.clone());
        let score = OutcomeScore::new(
            lo.id,
            outcome_id,
            RubricScore::new(4).unwrap(),
            EvidenceType::Direct,
        );
        state.records.outcome_scores.write().insert(score.id, score);

        let dashboard = compliance_dashboard(&state);
        assert_eq!(dashboard.student_outcomes.current, 1);
        assert_eq!(dashboard.student_outcomes.total, 1);
        // One assessment with a nonzero score; its composite is the
        // percentage directly.
        assert_eq!(dashboard.assessment_data.current, 1);
        assert!(dashboard.assessment_data.percentage > 0.0);
    }

    #[test]
    fn methods_dashboard_empty_catalog() {
        let state = AppState::new();
        let dashboard = methods_dashboard(&state);
        assert_eq!(dashboard.total_methods, 0);
        assert_eq!(dashboard.overall_compliance_rate, 0.0);
    }
}
