//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Static bearer token authentication. Set via ABET_AUTH_TOKEN.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ABET Accreditation API",
        version = "0.3.2",
        description = "University ABET-accreditation record keeping: assessment scoring, \
                       program and course rollups, outcome aggregation, and compliance \
                       dashboards.\n\nAuthentication: optional static bearer token via \
                       `Authorization: Bearer <token>`. Health probes (`/health/*`) and \
                       `/metrics` are unauthenticated.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        crate::routes::dashboard::get_stats,
        crate::routes::dashboard::get_compliance,
        crate::routes::dashboard::get_methods,
        crate::routes::assessments::create_assessment,
        crate::routes::assessments::get_score,
        crate::routes::assessments::add_continuous_improvement,
        crate::routes::assessments::add_academic_performance,
        crate::routes::assessments::add_learning_outcome,
        crate::routes::programs::get_program_average,
        crate::routes::programs::list_program_averages,
        crate::routes::courses::list_course_summaries,
        crate::routes::outcomes::list_outcomes,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::services::DashboardStats,
        crate::services::ProgramAverageEntry,
        crate::routes::dashboard::MetricResponse,
        crate::routes::dashboard::ComplianceDashboardResponse,
        crate::routes::dashboard::MethodSummaryResponse,
        crate::routes::dashboard::MethodsDashboardResponse,
        crate::routes::assessments::CreateAssessmentRequest,
        crate::routes::assessments::AssessmentResponse,
        crate::routes::assessments::CreateContinuousImprovementRequest,
        crate::routes::assessments::CreateAcademicPerformanceRequest,
        crate::routes::assessments::CreateLearningOutcomeRequest,
        crate::routes::assessments::OutcomeScoreRequest,
        crate::routes::assessments::CreatedResponse,
        crate::routes::assessments::ScoreResponse,
        crate::routes::programs::ProgramAverageResponse,
        crate::routes::courses::MappedOutcomeResponse,
        crate::routes::courses::CourseSummaryResponse,
        crate::routes::outcomes::OutcomeResponse,
    )),
    tags(
        (name = "dashboard", description = "Institution-wide read projections"),
        (name = "assessments", description = "Assessment and component writes, scoring"),
        (name = "programs", description = "Program-level rollups"),
        (name = "courses", description = "Per-course summaries"),
        (name = "outcomes", description = "Catalog outcome aggregation"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
