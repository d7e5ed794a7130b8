//! # Application State & Record Store
//!
//! Shared state for the Axum application: the in-memory record store,
//! runtime configuration, the optional Postgres pool, and the metrics
//! registry.
//!
//! ## Store Model
//!
//! Collections are `RwLock<BTreeMap<Uuid, T>>`. Ordered maps keep every
//! aggregation pass deterministic — two dashboard loads over unchanged
//! data walk the records in the same order and produce identical floats.
//! When a pool is configured, writes go through to Postgres and the store
//! is reloaded from it at startup; the engine itself only ever sees data
//! read back out of these collections.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::PgPool;
use uuid::Uuid;

use abet_core::{
    AbetOutcome, AcademicPerformance, Assessment, AssessmentMethod, ContinuousImprovement, Course,
    CourseMethodRecord, CourseSyllabus, Department, Enrollment, Faculty, FacultyTraining,
    LearningOutcome, OutcomeScore, Program, Semester,
};
use abet_engine::aggregate::OutcomeEvidence;

use crate::config::AppConfig;
use crate::events::AuditEvent;
use crate::middleware::metrics::ApiMetrics;

/// All record collections.
#[derive(Debug, Default)]
pub struct Records {
    pub departments: RwLock<BTreeMap<Uuid, Department>>,
    pub programs: RwLock<BTreeMap<Uuid, Program>>,
    pub courses: RwLock<BTreeMap<Uuid, Course>>,
    pub faculty: RwLock<BTreeMap<Uuid, Faculty>>,
    pub enrollments: RwLock<Vec<Enrollment>>,
    pub assessments: RwLock<BTreeMap<Uuid, Assessment>>,
    pub continuous_improvements: RwLock<BTreeMap<Uuid, ContinuousImprovement>>,
    pub academic_performances: RwLock<BTreeMap<Uuid, AcademicPerformance>>,
    pub learning_outcomes: RwLock<BTreeMap<Uuid, LearningOutcome>>,
    pub outcome_scores: RwLock<BTreeMap<Uuid, OutcomeScore>>,
    pub abet_outcomes: RwLock<BTreeMap<Uuid, AbetOutcome>>,
    pub methods: RwLock<BTreeMap<Uuid, AssessmentMethod>>,
    pub method_records: RwLock<BTreeMap<Uuid, CourseMethodRecord>>,
    pub syllabi: RwLock<BTreeMap<Uuid, CourseSyllabus>>,
    pub faculty_training: RwLock<BTreeMap<Uuid, FacultyTraining>>,
    pub audit_events: RwLock<Vec<AuditEvent>>,
}

impl Records {
    /// The three component groups of one assessment, in id order.
    ///
    /// Outcome scores are flattened across the assessment's learning
    /// outcomes.
    pub fn components_of(
        &self,
        assessment_id: Uuid,
    ) -> (
        Vec<ContinuousImprovement>,
        Vec<AcademicPerformance>,
        Vec<OutcomeScore>,
    ) {
        let ci: Vec<_> = self
            .continuous_improvements
            .read()
            .values()
            .filter(|c| c.assessment_id == assessment_id)
            .cloned()
            .collect();
        let ap: Vec<_> = self
            .academic_performances
            .read()
            .values()
            .filter(|a| a.assessment_id == assessment_id)
            .cloned()
            .collect();

        let outcome_ids: Vec<Uuid> = self
            .learning_outcomes
            .read()
            .values()
            .filter(|lo| lo.assessment_id == assessment_id)
            .map(|lo| lo.id)
            .collect();
        let scores: Vec<_> = self
            .outcome_scores
            .read()
            .values()
            .filter(|s| outcome_ids.contains(&s.learning_outcome_id))
            .cloned()
            .collect();

        (ci, ap, scores)
    }

    /// Assessment ids of one course, in id order.
    pub fn assessments_of_course(&self, course_id: Uuid) -> Vec<Uuid> {
        self.assessments
            .read()
            .values()
            .filter(|a| a.course_id == course_id)
            .map(|a| a.id)
            .collect()
    }

    /// Course ids of one program, in id order.
    pub fn courses_of_program(&self, program_id: Uuid) -> Vec<Uuid> {
        self.courses
            .read()
            .values()
            .filter(|c| c.program_id == program_id)
            .map(|c| c.id)
            .collect()
    }

    /// Number of students enrolled in a course.
    pub fn enrollment_count(&self, course_id: Uuid) -> usize {
        self.enrollments
            .read()
            .iter()
            .filter(|e| e.course_id == course_id)
            .count()
    }

    /// Every rubric score recorded against one catalog outcome, across
    /// the whole system.
    pub fn scores_for_outcome(&self, abet_outcome_id: Uuid) -> Vec<abet_core::RubricScore> {
        self.outcome_scores
            .read()
            .values()
            .filter(|s| s.abet_outcome_id == abet_outcome_id)
            .map(|s| s.score)
            .collect()
    }

    /// Flattened outcome evidence for one course: every outcome score of
    /// every learning outcome of every assessment, labeled with its
    /// catalog outcome. Scores referencing an unknown catalog entry are
    /// skipped with a warning — one orphaned row must not sink the
    /// course summary.
    pub fn evidence_for_course(&self, course_id: Uuid) -> Vec<OutcomeEvidence> {
        let assessment_ids = self.assessments_of_course(course_id);
        let outcome_ids: Vec<Uuid> = self
            .learning_outcomes
            .read()
            .values()
            .filter(|lo| assessment_ids.contains(&lo.assessment_id))
            .map(|lo| lo.id)
            .collect();

        let catalog = self.abet_outcomes.read();
        self.outcome_scores
            .read()
            .values()
            .filter(|s| outcome_ids.contains(&s.learning_outcome_id))
            .filter_map(|s| match catalog.get(&s.abet_outcome_id) {
                Some(outcome) => Some(OutcomeEvidence {
                    label: outcome.label.clone(),
                    score: s.score,
                    evidence_type: s.evidence_type,
                }),
                None => {
                    tracing::warn!(
                        outcome_score = %s.id,
                        abet_outcome = %s.abet_outcome_id,
                        "outcome score references unknown catalog entry, skipping"
                    );
                    None
                }
            })
            .collect()
    }

    /// Courses with an updated syllabus for the given academic year.
    pub fn updated_syllabi_count(&self, academic_year: &abet_core::AcademicYear) -> usize {
        self.syllabi
            .read()
            .values()
            .filter(|s| s.is_updated && &s.academic_year == academic_year)
            .count()
    }

    /// Distinct faculty with a completed training record for the year.
    pub fn trained_faculty_count(&self, academic_year: &abet_core::AcademicYear) -> usize {
        let distinct: std::collections::BTreeSet<Uuid> = self
            .faculty_training
            .read()
            .values()
            .filter(|t| t.completed && &t.academic_year == academic_year)
            .map(|t| t.faculty_id)
            .collect();
        distinct.len()
    }

    /// Active assessment methods, in id order.
    pub fn active_methods(&self) -> Vec<AssessmentMethod> {
        self.methods
            .read()
            .values()
            .filter(|m| m.is_active)
            .cloned()
            .collect()
    }

    /// One method's records for the given semester.
    pub fn method_records_for(&self, method_id: Uuid, semester: &Semester) -> Vec<CourseMethodRecord> {
        self.method_records
            .read()
            .values()
            .filter(|r| r.method_id == method_id && &r.semester == semester)
            .cloned()
            .collect()
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<Records>,
    pub config: Arc<AppConfig>,
    /// Write-through persistence; `None` in in-memory-only mode.
    pub db: Option<PgPool>,
    pub metrics: ApiMetrics,
}

impl AppState {
    /// In-memory-only state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// In-memory-only state with explicit configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            records: Arc::new(Records::default()),
            config: Arc::new(config),
            db: None,
            metrics: ApiMetrics::new(),
        }
    }

    /// Attach a Postgres pool for write-through persistence.
    pub fn with_db(mut self, pool: PgPool) -> Self {
        self.db = Some(pool);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .finish_non_exhaustive()
    }
}
