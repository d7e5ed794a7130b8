//! Catalog persistence: ABET outcomes, assessment methods, and per-course
//! method records. Seed operations are idempotent upserts keyed on the
//! stable label/slug so the CLI seed command can run repeatedly.

use sqlx::PgPool;
use uuid::Uuid;

use abet_core::{AbetOutcome, AssessmentMethod, CourseMethodRecord, EvidenceType, Semester};

use crate::state::Records;

/// Idempotently insert catalog outcomes, keyed on label.
pub async fn seed_abet_outcomes(
    pool: &PgPool,
    outcomes: &[AbetOutcome],
) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for outcome in outcomes {
        let result = sqlx::query(
            "INSERT INTO abet_outcomes (id, label, description)
             VALUES ($1, $2, $3)
             ON CONFLICT (label) DO NOTHING",
        )
        .bind(outcome.id)
        .bind(&outcome.label)
        .bind(&outcome.description)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

/// Idempotently insert assessment methods, keyed on slug.
pub async fn seed_methods(
    pool: &PgPool,
    methods: &[AssessmentMethod],
) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for method in methods {
        let result = sqlx::query(
            "INSERT INTO assessment_methods
             (id, name, display_name, assessment_type, description,
              target_completion_rate, target_score, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(method.id)
        .bind(&method.name)
        .bind(&method.display_name)
        .bind(method.assessment_type.as_str())
        .bind(&method.description)
        .bind(method.target_completion_rate)
        .bind(method.target_score)
        .bind(method.is_active)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

/// Load both catalogs and the method records.
pub async fn load_all(pool: &PgPool, records: &Records) -> Result<(), sqlx::Error> {
    let outcomes = sqlx::query_as::<_, AbetOutcomeRow>(
        "SELECT id, label, description FROM abet_outcomes ORDER BY label",
    )
    .fetch_all(pool)
    .await?;
    records.abet_outcomes.write().extend(outcomes.into_iter().map(|r| {
        (
            r.id,
            AbetOutcome {
                id: r.id,
                label: r.label,
                description: r.description,
            },
        )
    }));

    let methods = sqlx::query_as::<_, MethodRow>(
        "SELECT id, name, display_name, assessment_type, description,
                target_completion_rate, target_score, is_active
         FROM assessment_methods ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .methods
        .write()
        .extend(methods.into_iter().filter_map(|r| r.into_record().map(|m| (m.id, m))));

    let method_records = sqlx::query_as::<_, MethodRecordRow>(
        "SELECT id, course_id, method_id, semester, completed, score
         FROM course_method_records ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .method_records
        .write()
        .extend(method_records.into_iter().filter_map(|r| r.into_record().map(|m| (m.id, m))));

    Ok(())
}

#[derive(sqlx::FromRow)]
struct AbetOutcomeRow {
    id: Uuid,
    label: String,
    description: String,
}

#[derive(sqlx::FromRow)]
struct MethodRow {
    id: Uuid,
    name: String,
    display_name: String,
    assessment_type: String,
    description: String,
    target_completion_rate: f64,
    target_score: f64,
    is_active: bool,
}

impl MethodRow {
    fn into_record(self) -> Option<AssessmentMethod> {
        let assessment_type = match EvidenceType::parse(&self.assessment_type) {
            Some(t) => t,
            None => {
                tracing::warn!(id = %self.id, assessment_type = %self.assessment_type, "skipping method row with unknown assessment type");
                return None;
            }
        };
        Some(AssessmentMethod {
            id: self.id,
            name: self.name,
            display_name: self.display_name,
            assessment_type,
            description: self.description,
            target_completion_rate: self.target_completion_rate,
            target_score: self.target_score,
            is_active: self.is_active,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MethodRecordRow {
    id: Uuid,
    course_id: Uuid,
    method_id: Uuid,
    semester: String,
    completed: bool,
    score: Option<f64>,
}

impl MethodRecordRow {
    fn into_record(self) -> Option<CourseMethodRecord> {
        match Semester::new(self.semester) {
            Ok(semester) => Some(CourseMethodRecord {
                id: self.id,
                course_id: self.course_id,
                method_id: self.method_id,
                semester,
                completed: self.completed,
                score: self.score,
            }),
            Err(err) => {
                tracing::warn!(id = %self.id, error = %err, "skipping method record row with blank semester");
                None
            }
        }
    }
}
