//! # Course Summary Routes
//!
//! Per-course assessment summaries: average composite score, ABET outcome
//! coverage, and the two-dimensional status classification.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use abet_engine::{CourseSummary, MappedOutcome};

use crate::services;
use crate::state::AppState;

/// Build the courses router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/courses/summary", get(list_course_summaries))
}

/// One catalog outcome as touched by a course.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MappedOutcomeResponse {
    pub label: String,
    /// Best rubric score observed for this outcome.
    pub score: u8,
    pub met: bool,
    pub evidence_type: String,
}

impl From<MappedOutcome> for MappedOutcomeResponse {
    fn from(o: MappedOutcome) -> Self {
        Self {
            label: o.label,
            score: o.score,
            met: o.met,
            evidence_type: o.evidence_type.as_str().to_string(),
        }
    }
}

/// One course's assessment summary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseSummaryResponse {
    pub code: String,
    pub name: String,
    pub instructor: String,
    pub enrollment: usize,
    pub outcomes: Vec<String>,
    pub mapped_outcomes: Vec<MappedOutcomeResponse>,
    pub outcome_coverage: f64,
    pub assessment_score: f64,
    /// excellent | good | needs_improvement | needs_review | needs_assessment
    pub status: String,
}

impl From<CourseSummary> for CourseSummaryResponse {
    fn from(s: CourseSummary) -> Self {
        Self {
            code: s.code,
            name: s.name,
            instructor: s.instructor,
            enrollment: s.enrollment,
            outcomes: s.outcomes,
            mapped_outcomes: s.mapped_outcomes.into_iter().map(Into::into).collect(),
            outcome_coverage: s.outcome_coverage,
            assessment_score: s.assessment_score,
            status: s.status.as_str().to_string(),
        }
    }
}

/// GET /v1/courses/summary — Summaries for every course.
#[utoipa::path(
    get,
    path = "/v1/courses/summary",
    responses(
        (status = 200, description = "Course assessment summaries", body = [CourseSummaryResponse]),
    ),
    tag = "courses"
)]
pub(crate) async fn list_course_summaries(
    State(state): State<AppState>,
) -> Json<Vec<CourseSummaryResponse>> {
    Json(
        services::course_summaries(&state)
            .into_iter()
            .map(Into::into)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use abet_core::{
        AbetOutcome, AcademicPerformance, Assessment, Course, EvidenceType, LearningOutcome,
        OutcomeScore, RubricScore,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn summaries(state: AppState) -> Vec<CourseSummaryResponse> {
        let resp = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/v1/courses/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    #[tokio::test]
    async fn course_without_assessments_needs_assessment() {
        let state = AppState::new();
        let course = Course {
            id: Uuid::new_v4(),
            name: "Fluid Mechanics".into(),
            description: "Viscous flow".into(),
            credits: 3,
            program_id: Uuid::new_v4(),
            instructor: None,
        };
        state.records.courses.write().insert(course.id, course);

        let rows = summaries(state).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "needs_assessment");
        assert_eq!(rows[0].instructor, "TBD");
        assert_eq!(rows[0].assessment_score, 0.0);
    }

    #[tokio::test]
    async fn scored_course_reports_coverage_and_status() {
        let state = AppState::new();
        for outcome in AbetOutcome::standard_catalog() {
            state.records.abet_outcomes.write().insert(outcome.id, outcome);
        }
        let catalog_first = state
            .records
            .abet_outcomes
            .read()
            .values()
            .next()
            .unwrap()
            .clone();

        let course = Course {
            id: Uuid::new_v4(),
            name: "Heat Transfer".into(),
            description: "Conduction and convection".into(),
            credits: 3,
            program_id: Uuid::new_v4(),
            instructor: Some("M. Ito".into()),
        };
        let assessment = Assessment::new(
            "Design project",
            chrono::NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
            course.id,
            Utc::now(),
        )
        .unwrap();
        let ap = AcademicPerformance {
            id: Uuid::new_v4(),
            assessment_id: assessment.id,
            grade: 88,
            weight: 1,
            performance_type: "project".into(),
        };
        let lo = LearningOutcome {
            id: Uuid::new_v4(),
            assessment_id: assessment.id,
            description: "fin design".into(),
        };
        let os = OutcomeScore::new(
            lo.id,
            catalog_first.id,
            RubricScore::new(4).unwrap(),
            EvidenceType::Direct,
        );

        state.records.courses.write().insert(course.id, course);
        state
            .records
            .assessments
            .write()
            .insert(assessment.id, assessment);
        state.records.academic_performances.write().insert(ap.id, ap);
        state.records.learning_outcomes.write().insert(lo.id, lo);
        state.records.outcome_scores.write().insert(os.id, os);

        let rows = summaries(state).await;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.instructor, "M. Ito");
        // Two groups: grade 88 and rubric 4 → 100%; mean 94.
        assert_eq!(row.assessment_score, 94.0);
        // 1 of 7 outcomes touched.
        assert_eq!(row.outcome_coverage, 14.3);
        assert_eq!(row.mapped_outcomes.len(), 1);
        assert!(row.mapped_outcomes[0].met);
        // High score but thin coverage: the OR clause applies.
        assert_eq!(row.status, "needs_improvement");
    }
}
