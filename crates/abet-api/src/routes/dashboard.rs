//! # Dashboard Routes
//!
//! The three institution-wide read projections: entity counts with the
//! average score, the four compliance metrics, and assessment-method
//! compliance.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use abet_engine::{ComplianceMetric, MethodSummary, MethodsDashboard};

use crate::services::{self, DashboardStats};
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/dashboard/stats", get(get_stats))
        .route("/v1/dashboard/compliance", get(get_compliance))
        .route("/v1/dashboard/methods", get(get_methods))
}

// ── Response types ──────────────────────────────────────────────────────────

/// One institutional compliance metric.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricResponse {
    pub name: String,
    pub percentage: f64,
    pub current: usize,
    pub total: usize,
    /// A percentage number, or a count fraction like "5/7".
    #[schema(value_type = Object)]
    pub target: serde_json::Value,
    /// excellent | good | warning | critical
    pub status: String,
}

impl From<ComplianceMetric> for MetricResponse {
    fn from(m: ComplianceMetric) -> Self {
        Self {
            name: m.name.to_string(),
            percentage: m.percentage,
            current: m.current,
            total: m.total,
            target: serde_json::to_value(m.target).unwrap_or(serde_json::Value::Null),
            status: m.status.as_str().to_string(),
        }
    }
}

/// The four institutional compliance metrics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplianceDashboardResponse {
    pub course_syllabi: MetricResponse,
    pub assessment_data: MetricResponse,
    pub student_outcomes: MetricResponse,
    pub faculty_training: MetricResponse,
}

/// One assessment method's compliance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MethodSummaryResponse {
    pub name: String,
    pub display_name: String,
    /// direct | indirect
    pub assessment_type: String,
    pub courses: usize,
    pub completion_rate: f64,
    pub avg_score: f64,
    pub target_completion: f64,
    pub target_score: f64,
    pub is_compliant: bool,
}

impl From<MethodSummary> for MethodSummaryResponse {
    fn from(m: MethodSummary) -> Self {
        Self {
            name: m.name,
            display_name: m.display_name,
            assessment_type: m.assessment_type.as_str().to_string(),
            courses: m.courses,
            completion_rate: m.completion_rate,
            avg_score: m.avg_score,
            target_completion: m.target_completion,
            target_score: m.target_score,
            is_compliant: m.is_compliant,
        }
    }
}

/// The assessment-method compliance dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MethodsDashboardResponse {
    pub overall_compliance_rate: f64,
    pub direct_assessment_compliance: f64,
    pub indirect_assessment_compliance: f64,
    pub total_methods: usize,
    pub compliant_methods: usize,
    pub methods: Vec<MethodSummaryResponse>,
}

impl From<MethodsDashboard> for MethodsDashboardResponse {
    fn from(d: MethodsDashboard) -> Self {
        Self {
            overall_compliance_rate: d.overall_compliance_rate,
            direct_assessment_compliance: d.direct_assessment_compliance,
            indirect_assessment_compliance: d.indirect_assessment_compliance,
            total_methods: d.total_methods,
            compliant_methods: d.compliant_methods,
            methods: d.methods.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// GET /v1/dashboard/stats — Entity counts and the average score.
#[utoipa::path(
    get,
    path = "/v1/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
    ),
    tag = "dashboard"
)]
pub(crate) async fn get_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(services::dashboard_stats(&state))
}

/// GET /v1/dashboard/compliance — The four institutional metrics.
#[utoipa::path(
    get,
    path = "/v1/dashboard/compliance",
    responses(
        (status = 200, description = "Compliance metrics", body = ComplianceDashboardResponse),
    ),
    tag = "dashboard"
)]
pub(crate) async fn get_compliance(State(state): State<AppState>) -> Json<ComplianceDashboardResponse> {
    let dashboard = services::compliance_dashboard(&state);
    Json(ComplianceDashboardResponse {
        course_syllabi: dashboard.course_syllabi.into(),
        assessment_data: dashboard.assessment_data.into(),
        student_outcomes: dashboard.student_outcomes.into(),
        faculty_training: dashboard.faculty_training.into(),
    })
}

/// GET /v1/dashboard/methods — Assessment-method compliance.
#[utoipa::path(
    get,
    path = "/v1/dashboard/methods",
    responses(
        (status = 200, description = "Method compliance dashboard", body = MethodsDashboardResponse),
    ),
    tag = "dashboard"
)]
pub(crate) async fn get_methods(State(state): State<AppState>) -> Json<MethodsDashboardResponse> {
    Json(services::methods_dashboard(&state).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use abet_core::{
        AssessmentMethod, Course, CourseMethodRecord, CourseSyllabus, Faculty, FacultyTraining,
        Semester,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn get_json<T: serde::de::DeserializeOwned>(state: AppState, uri: &str) -> T {
        let resp = router()
            .with_state(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn stats_on_empty_store() {
        let stats: DashboardStats = get_json(AppState::new(), "/v1/dashboard/stats").await;
        assert_eq!(stats.assessments, 0);
        assert_eq!(stats.average_score, 0.0);
    }

    #[tokio::test]
    async fn compliance_metrics_cover_all_four() {
        let state = AppState::new();

        let course = Course {
            id: Uuid::new_v4(),
            name: "Controls".into(),
            description: "Feedback systems".into(),
            credits: 3,
            program_id: Uuid::new_v4(),
            instructor: None,
        };
        let syllabus = CourseSyllabus {
            id: Uuid::new_v4(),
            course_id: course.id,
            academic_year: state.config.academic_year.clone(),
            is_updated: true,
        };
        let member = Faculty {
            id: Uuid::new_v4(),
            name: "A. Demir".into(),
            email: "demir@example.edu".into(),
            department_id: Uuid::new_v4(),
        };
        let training = FacultyTraining {
            id: Uuid::new_v4(),
            faculty_id: member.id,
            academic_year: state.config.academic_year.clone(),
            completed: true,
            training_name: "rubric calibration".into(),
        };
        state.records.courses.write().insert(course.id, course);
        state.records.syllabi.write().insert(syllabus.id, syllabus);
        state.records.faculty.write().insert(member.id, member);
        state.records.faculty_training.write().insert(training.id, training);

        let dashboard: ComplianceDashboardResponse =
            get_json(state, "/v1/dashboard/compliance").await;
        assert_eq!(dashboard.course_syllabi.percentage, 100.0);
        assert_eq!(dashboard.course_syllabi.status, "excellent");
        assert_eq!(dashboard.faculty_training.percentage, 100.0);
        // No assessments and no catalog: both report critical, not errors.
        assert_eq!(dashboard.assessment_data.status, "critical");
        assert_eq!(dashboard.student_outcomes.status, "critical");
    }

    #[tokio::test]
    async fn methods_dashboard_segments() {
        let state = AppState::new();
        let semester = Semester::new("Fall 2024").unwrap();
        for method in AssessmentMethod::standard_methods() {
            // One completed, well-scored course per method.
            let record = CourseMethodRecord {
                id: Uuid::new_v4(),
                course_id: Uuid::new_v4(),
                method_id: method.id,
                semester: semester.clone(),
                completed: true,
                score: Some(3.6),
            };
            state.records.method_records.write().insert(record.id, record);
            state.records.methods.write().insert(method.id, method);
        }

        let dashboard: MethodsDashboardResponse =
            get_json(state, "/v1/dashboard/methods").await;
        assert_eq!(dashboard.total_methods, 4);
        assert_eq!(dashboard.compliant_methods, 4);
        assert_eq!(dashboard.overall_compliance_rate, 100.0);
        assert_eq!(dashboard.direct_assessment_compliance, 100.0);
        assert_eq!(dashboard.indirect_assessment_compliance, 100.0);
    }

    #[tokio::test]
    async fn metric_target_serializes_fraction_as_string() {
        let metric: MetricResponse =
            abet_engine::outcomes_met_metric(5, 7).into();
        assert_eq!(metric.target, serde_json::json!("5/7"));
    }
}
