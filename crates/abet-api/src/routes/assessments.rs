//! # Assessment Routes
//!
//! Write endpoints for assessments and their components, plus the
//! per-assessment score projection. Writes require the faculty or admin
//! role, mirror to Postgres when configured, and emit an audit event with
//! the explicit caller as the actor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use abet_core::{
    AcademicPerformance, Assessment, ContinuousImprovement, EvidenceType, LearningOutcome,
    OutcomeScore, RubricScore,
};
use abet_engine::ScoreResult;

use crate::auth::{require_writer, CallerIdentity};
use crate::error::AppError;
use crate::events;
use crate::state::AppState;

/// Build the assessments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/assessments", post(create_assessment))
        .route("/v1/assessments/:assessment_id/score", get(get_score))
        .route(
            "/v1/assessments/:assessment_id/continuous-improvements",
            post(add_continuous_improvement),
        )
        .route(
            "/v1/assessments/:assessment_id/academic-performances",
            post(add_academic_performance),
        )
        .route(
            "/v1/assessments/:assessment_id/learning-outcomes",
            post(add_learning_outcome),
        )
}

// ── Request/response types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAssessmentRequest {
    pub name: String,
    pub date: NaiveDate,
    pub course_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResponse {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Assessment> for AssessmentResponse {
    fn from(a: Assessment) -> Self {
        Self {
            id: a.id,
            name: a.name,
            date: a.date,
            course_id: a.course_id,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateContinuousImprovementRequest {
    /// Effectiveness score, 0–100.
    pub score: f64,
    pub weight: u32,
    pub action_taken: String,
    pub effectiveness_measure: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAcademicPerformanceRequest {
    /// Integer grade, 0–100.
    pub grade: u16,
    pub weight: u32,
    pub performance_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OutcomeScoreRequest {
    pub abet_outcome_id: Uuid,
    /// Rubric score, 1–4.
    pub score: u8,
    pub evidence_type: EvidenceType,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLearningOutcomeRequest {
    pub description: String,
    /// Rubric scores mapping this outcome onto the ABET catalog.
    pub scores: Vec<OutcomeScoreRequest>,
}

/// Identifier response for component writes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// Per-assessment score projection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub composite_score: f64,
    pub continuous_improvement_score: f64,
    pub academic_performance_score: f64,
    pub learning_outcome_score: f64,
    pub is_accredited: bool,
}

impl From<ScoreResult> for ScoreResponse {
    fn from(r: ScoreResult) -> Self {
        Self {
            composite_score: r.composite_score,
            continuous_improvement_score: r.continuous_improvement_score,
            academic_performance_score: r.academic_performance_score,
            learning_outcome_score: r.learning_outcome_score,
            is_accredited: r.is_accredited,
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────────────

fn require_assessment(state: &AppState, assessment_id: Uuid) -> Result<(), AppError> {
    if state
        .records
        .assessments
        .read()
        .contains_key(&assessment_id)
    {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "assessment {assessment_id} does not exist"
        )))
    }
}

/// POST /v1/assessments — Create an assessment for a course.
#[utoipa::path(
    post,
    path = "/v1/assessments",
    request_body = CreateAssessmentRequest,
    responses(
        (status = 201, description = "Assessment created", body = AssessmentResponse),
        (status = 403, description = "Caller role is read-only"),
        (status = 422, description = "Blank name or unknown course"),
    ),
    tag = "assessments"
)]
pub(crate) async fn create_assessment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentResponse>), AppError> {
    require_writer(&caller)?;

    if !state.records.courses.read().contains_key(&req.course_id) {
        return Err(AppError::Validation(format!(
            "course {} does not exist",
            req.course_id
        )));
    }

    let assessment = Assessment::new(req.name, req.date, req.course_id, Utc::now())?;

    if let Some(pool) = &state.db {
        crate::db::assessments::insert_assessment(pool, &assessment).await?;
    }
    state
        .records
        .assessments
        .write()
        .insert(assessment.id, assessment.clone());

    events::emit(
        &state,
        caller.actor(),
        "create",
        "assessment",
        assessment.id,
        assessment.name.clone(),
    );

    Ok((StatusCode::CREATED, Json(assessment.into())))
}

/// GET /v1/assessments/{assessment_id}/score — Score one assessment.
///
/// The composite is recomputed from current components on every call; an
/// unknown id is a 404 here (batch aggregation zero-fills instead).
#[utoipa::path(
    get,
    path = "/v1/assessments/{assessment_id}/score",
    params(("assessment_id" = Uuid, Path, description = "Assessment to score")),
    responses(
        (status = 200, description = "Score result", body = ScoreResponse),
        (status = 404, description = "Unknown assessment"),
    ),
    tag = "assessments"
)]
pub(crate) async fn get_score(
    State(state): State<AppState>,
    Path(assessment_id): Path<Uuid>,
) -> Result<Json<ScoreResponse>, AppError> {
    require_assessment(&state, assessment_id)?;
    Ok(Json(crate::services::assessment_score(&state, assessment_id).into()))
}

/// POST /v1/assessments/{assessment_id}/continuous-improvements
#[utoipa::path(
    post,
    path = "/v1/assessments/{assessment_id}/continuous-improvements",
    request_body = CreateContinuousImprovementRequest,
    params(("assessment_id" = Uuid, Path, description = "Owning assessment")),
    responses(
        (status = 201, description = "Component created", body = CreatedResponse),
        (status = 404, description = "Unknown assessment"),
        (status = 422, description = "Score outside 0–100"),
    ),
    tag = "assessments"
)]
pub(crate) async fn add_continuous_improvement(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(assessment_id): Path<Uuid>,
    Json(req): Json<CreateContinuousImprovementRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    require_writer(&caller)?;
    require_assessment(&state, assessment_id)?;

    if !(0.0..=100.0).contains(&req.score) {
        return Err(AppError::Validation(format!(
            "score must be between 0 and 100, got {}",
            req.score
        )));
    }

    let component = ContinuousImprovement {
        id: Uuid::new_v4(),
        assessment_id,
        score: req.score,
        weight: req.weight,
        action_taken: req.action_taken,
        effectiveness_measure: req.effectiveness_measure,
    };

    if let Some(pool) = &state.db {
        crate::db::assessments::insert_continuous_improvement(pool, &component).await?;
    }
    let id = component.id;
    state
        .records
        .continuous_improvements
        .write()
        .insert(id, component);

    events::emit(
        &state,
        caller.actor(),
        "create",
        "continuous_improvement",
        id,
        format!("assessment {assessment_id}"),
    );

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /v1/assessments/{assessment_id}/academic-performances
#[utoipa::path(
    post,
    path = "/v1/assessments/{assessment_id}/academic-performances",
    request_body = CreateAcademicPerformanceRequest,
    params(("assessment_id" = Uuid, Path, description = "Owning assessment")),
    responses(
        (status = 201, description = "Component created", body = CreatedResponse),
        (status = 404, description = "Unknown assessment"),
        (status = 422, description = "Grade outside 0–100"),
    ),
    tag = "assessments"
)]
pub(crate) async fn add_academic_performance(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(assessment_id): Path<Uuid>,
    Json(req): Json<CreateAcademicPerformanceRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    require_writer(&caller)?;
    require_assessment(&state, assessment_id)?;

    let grade = AcademicPerformance::validate_grade(req.grade)?;
    let component = AcademicPerformance {
        id: Uuid::new_v4(),
        assessment_id,
        grade,
        weight: req.weight,
        performance_type: req.performance_type,
    };

    if let Some(pool) = &state.db {
        crate::db::assessments::insert_academic_performance(pool, &component).await?;
    }
    let id = component.id;
    state
        .records
        .academic_performances
        .write()
        .insert(id, component);

    events::emit(
        &state,
        caller.actor(),
        "create",
        "academic_performance",
        id,
        format!("assessment {assessment_id}"),
    );

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /v1/assessments/{assessment_id}/learning-outcomes
///
/// Creates the learning outcome and its rubric scores in one write. Level
/// descriptions are derived from the scores here — a client-supplied
/// description is not accepted.
#[utoipa::path(
    post,
    path = "/v1/assessments/{assessment_id}/learning-outcomes",
    request_body = CreateLearningOutcomeRequest,
    params(("assessment_id" = Uuid, Path, description = "Owning assessment")),
    responses(
        (status = 201, description = "Learning outcome created", body = CreatedResponse),
        (status = 404, description = "Unknown assessment"),
        (status = 422, description = "Rubric score outside 1–4 or unknown catalog outcome"),
    ),
    tag = "assessments"
)]
pub(crate) async fn add_learning_outcome(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(assessment_id): Path<Uuid>,
    Json(req): Json<CreateLearningOutcomeRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    require_writer(&caller)?;
    require_assessment(&state, assessment_id)?;

    // Validate every score row before writing anything.
    let mut scores = Vec::with_capacity(req.scores.len());
    {
        let catalog = state.records.abet_outcomes.read();
        for row in &req.scores {
            if !catalog.contains_key(&row.abet_outcome_id) {
                return Err(AppError::Validation(format!(
                    "ABET outcome {} is not in the catalog",
                    row.abet_outcome_id
                )));
            }
            scores.push((row.abet_outcome_id, RubricScore::new(row.score)?, row.evidence_type));
        }
    }

    let outcome = LearningOutcome {
        id: Uuid::new_v4(),
        assessment_id,
        description: req.description,
    };
    let outcome_scores: Vec<OutcomeScore> = scores
        .into_iter()
        .map(|(abet_outcome_id, score, evidence_type)| {
            OutcomeScore::new(outcome.id, abet_outcome_id, score, evidence_type)
        })
        .collect();

    if let Some(pool) = &state.db {
        crate::db::assessments::insert_learning_outcome(pool, &outcome, &outcome_scores).await?;
    }
    let id = outcome.id;
    state
        .records
        .learning_outcomes
        .write()
        .insert(id, outcome);
    state
        .records
        .outcome_scores
        .write()
        .extend(outcome_scores.into_iter().map(|s| (s.id, s)));

    events::emit(
        &state,
        caller.actor(),
        "create",
        "learning_outcome",
        id,
        format!("assessment {assessment_id}"),
    );

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}
