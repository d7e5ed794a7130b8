//! # Program Rollup Routes
//!
//! Program-level score averages: one program by id, or the full listing
//! for the accreditation status board.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::{self, ProgramAverageEntry};
use crate::state::AppState;

/// Build the programs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/programs/averages", get(list_program_averages))
        .route("/v1/programs/:program_id/average", get(get_program_average))
}

/// One program's rollup.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgramAverageResponse {
    pub program_id: Uuid,
    pub average_score: f64,
    pub is_accredited: bool,
    pub assessment_count: usize,
}

/// GET /v1/programs/{program_id}/average — Aggregate one program.
///
/// Averages over every assessment of every course under the program;
/// a program with no assessments reports zero, not an error. Only the
/// program id itself being unknown is a 404.
#[utoipa::path(
    get,
    path = "/v1/programs/{program_id}/average",
    params(("program_id" = Uuid, Path, description = "Program to aggregate")),
    responses(
        (status = 200, description = "Program average", body = ProgramAverageResponse),
        (status = 404, description = "Unknown program"),
    ),
    tag = "programs"
)]
pub(crate) async fn get_program_average(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> Result<Json<ProgramAverageResponse>, AppError> {
    let average = services::program_average(&state, program_id)
        .ok_or_else(|| AppError::NotFound(format!("program {program_id} does not exist")))?;
    Ok(Json(ProgramAverageResponse {
        program_id,
        average_score: average.average_score,
        is_accredited: average.is_accredited,
        assessment_count: average.assessment_count,
    }))
}

/// GET /v1/programs/averages — Rollups for every program.
#[utoipa::path(
    get,
    path = "/v1/programs/averages",
    responses(
        (status = 200, description = "All program averages", body = [ProgramAverageEntry]),
    ),
    tag = "programs"
)]
pub(crate) async fn list_program_averages(
    State(state): State<AppState>,
) -> Json<Vec<ProgramAverageEntry>> {
    Json(services::all_program_averages(&state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use abet_core::{AcademicPerformance, Assessment, Course, Program};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn seeded_state() -> (AppState, Uuid) {
        let state = AppState::new();
        let program = Program {
            id: Uuid::new_v4(),
            name: "Electrical Engineering".into(),
            description: "BSEE".into(),
            department_id: Uuid::new_v4(),
        };
        let course = Course {
            id: Uuid::new_v4(),
            name: "Circuits I".into(),
            description: "Linear circuit analysis".into(),
            credits: 4,
            program_id: program.id,
            instructor: None,
        };
        let assessment = Assessment::new(
            "Lab practical",
            chrono::NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            course.id,
            Utc::now(),
        )
        .unwrap();
        let ap = AcademicPerformance {
            id: Uuid::new_v4(),
            assessment_id: assessment.id,
            grade: 92,
            weight: 1,
            performance_type: "lab".into(),
        };

        let program_id = program.id;
        state.records.programs.write().insert(program.id, program);
        state.records.courses.write().insert(course.id, course);
        state
            .records
            .assessments
            .write()
            .insert(assessment.id, assessment);
        state.records.academic_performances.write().insert(ap.id, ap);
        (state, program_id)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn program_average_for_known_program() {
        let (state, program_id) = seeded_state();
        let resp = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/programs/{program_id}/average"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let avg: ProgramAverageResponse = body_json(resp).await;
        assert_eq!(avg.average_score, 92.0);
        assert!(avg.is_accredited);
        assert_eq!(avg.assessment_count, 1);
    }

    #[tokio::test]
    async fn unknown_program_is_404() {
        let (state, _) = seeded_state();
        let resp = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/programs/{}/average", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn listing_covers_every_program() {
        let (state, program_id) = seeded_state();
        let resp = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/v1/programs/averages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let entries: Vec<ProgramAverageEntry> = body_json(resp).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].program_id, program_id);
        assert_eq!(entries[0].program_name, "Electrical Engineering");
    }
}
