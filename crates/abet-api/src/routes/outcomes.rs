//! # Outcome Dashboard Routes
//!
//! Catalog-outcome aggregation across every assessment in the system.
//! Originally a debugging endpoint for accreditation reviews; kept as the
//! canonical read of per-outcome standing.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use abet_engine::OutcomeAggregate;

use crate::services;
use crate::state::AppState;

/// Build the outcomes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/outcomes", get(list_outcomes))
}

/// One catalog outcome's aggregate standing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OutcomeResponse {
    pub label: String,
    pub description: String,
    /// Raw mean on the 1–4 scale.
    pub average_score: f64,
    pub percentage: f64,
    pub target: f64,
    pub target_score: f64,
    /// exceeded | met | below
    pub status: String,
}

impl From<OutcomeAggregate> for OutcomeResponse {
    fn from(o: OutcomeAggregate) -> Self {
        Self {
            label: o.label,
            description: o.description,
            average_score: o.average_score,
            percentage: o.percentage,
            target: o.target,
            target_score: o.target_score,
            status: o.status.as_str().to_string(),
        }
    }
}

/// GET /v1/outcomes — Aggregate standing of every catalog outcome.
#[utoipa::path(
    get,
    path = "/v1/outcomes",
    responses(
        (status = 200, description = "Catalog outcome aggregates", body = [OutcomeResponse]),
    ),
    tag = "outcomes"
)]
pub(crate) async fn list_outcomes(State(state): State<AppState>) -> Json<Vec<OutcomeResponse>> {
    Json(
        services::outcomes_dashboard(&state)
            .into_iter()
            .map(Into::into)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use abet_core::{
        AbetOutcome, Assessment, EvidenceType, LearningOutcome, OutcomeScore, RubricScore,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn outcomes_with_no_evidence_report_below() {
        let state = AppState::new();
        for outcome in AbetOutcome::standard_catalog() {
            state.records.abet_outcomes.write().insert(outcome.id, outcome);
        }

        let resp = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/v1/outcomes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let rows: Vec<OutcomeResponse> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|r| r.status == "below"));
        assert_eq!(rows[0].label, "SO1");
    }

    #[tokio::test]
    async fn scored_outcome_reports_mean_and_status() {
        let state = AppState::new();
        let outcome = AbetOutcome::new("SO4", "ethical judgment");
        let outcome_id = outcome.id;
        state.records.abet_outcomes.write().insert(outcome.id, outcome);

        let assessment = Assessment::new(
            "Ethics case study",
            chrono::NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
            Uuid::new_v4(),
            Utc::now(),
        )
        .unwrap();
        let lo = LearningOutcome {
            id: Uuid::new_v4(),
            assessment_id: assessment.id,
            description: "evaluate a dilemma".into(),
        };
        state
            .records
            .assessments
            .write()
            .insert(assessment.id, assessment);
        state.records.learning_outcomes.write().insert(lo.id, lo.clone());
        for value in [4u8, 2] {
            let os = OutcomeScore::new(
                lo.id,
                outcome_id,
                RubricScore::new(value).unwrap(),
                EvidenceType::Indirect,
            );
            state.records.outcome_scores.write().insert(os.id, os);
        }

        let resp = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/v1/outcomes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let rows: Vec<OutcomeResponse> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].average_score, 3.0);
        assert_eq!(rows[0].percentage, 75.0);
        assert_eq!(rows[0].status, "met");
    }
}
