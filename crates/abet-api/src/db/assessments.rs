//! Assessment and component persistence.
//!
//! Inserts are write-through mirrors of store mutations; learning-outcome
//! creation inserts the outcome and its scores in one transaction so a
//! partial write can never appear in the database.

use sqlx::PgPool;
use uuid::Uuid;

use abet_core::{
    AcademicPerformance, Assessment, ContinuousImprovement, EvidenceType, LearningOutcome,
    OutcomeScore, RubricScore,
};

use crate::state::Records;

/// Insert a new assessment.
pub async fn insert_assessment(pool: &PgPool, assessment: &Assessment) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO assessments (id, name, date, course_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(assessment.id)
    .bind(&assessment.name)
    .bind(assessment.date)
    .bind(assessment.course_id)
    .bind(assessment.created_at)
    .bind(assessment.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a continuous-improvement component.
pub async fn insert_continuous_improvement(
    pool: &PgPool,
    component: &ContinuousImprovement,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO continuous_improvements
         (id, assessment_id, score, weight, action_taken, effectiveness_measure)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(component.id)
    .bind(component.assessment_id)
    .bind(component.score)
    .bind(component.weight as i32)
    .bind(&component.action_taken)
    .bind(&component.effectiveness_measure)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert an academic-performance component.
pub async fn insert_academic_performance(
    pool: &PgPool,
    component: &AcademicPerformance,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO academic_performances
         (id, assessment_id, grade, weight, performance_type)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(component.id)
    .bind(component.assessment_id)
    .bind(i16::from(component.grade))
    .bind(component.weight as i32)
    .bind(&component.performance_type)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a learning outcome and its rubric scores in one transaction.
pub async fn insert_learning_outcome(
    pool: &PgPool,
    outcome: &LearningOutcome,
    scores: &[OutcomeScore],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO learning_outcomes (id, assessment_id, description)
         VALUES ($1, $2, $3)",
    )
    .bind(outcome.id)
    .bind(outcome.assessment_id)
    .bind(&outcome.description)
    .execute(&mut *tx)
    .await?;

    for score in scores {
        sqlx::query(
            "INSERT INTO outcome_scores
             (id, learning_outcome_id, abet_outcome_id, score, evidence_type, level_description)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(score.id)
        .bind(score.learning_outcome_id)
        .bind(score.abet_outcome_id)
        .bind(i16::from(score.score.as_u8()))
        .bind(score.evidence_type.as_str())
        .bind(&score.level_description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Load assessments and every component collection.
pub async fn load_all(pool: &PgPool, records: &Records) -> Result<(), sqlx::Error> {
    let assessments = sqlx::query_as::<_, AssessmentRow>(
        "SELECT id, name, date, course_id, created_at, updated_at
         FROM assessments ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records.assessments.write().extend(assessments.into_iter().map(|r| {
        (
            r.id,
            Assessment {
                id: r.id,
                name: r.name,
                date: r.date,
                course_id: r.course_id,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
        )
    }));

    let ci = sqlx::query_as::<_, ContinuousImprovementRow>(
        "SELECT id, assessment_id, score, weight, action_taken, effectiveness_measure
         FROM continuous_improvements ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .continuous_improvements
        .write()
        .extend(ci.into_iter().filter_map(|r| r.into_record().map(|c| (c.id, c))));

    let ap = sqlx::query_as::<_, AcademicPerformanceRow>(
        "SELECT id, assessment_id, grade, weight, performance_type
         FROM academic_performances ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .academic_performances
        .write()
        .extend(ap.into_iter().filter_map(|r| r.into_record().map(|a| (a.id, a))));

    let outcomes = sqlx::query_as::<_, LearningOutcomeRow>(
        "SELECT id, assessment_id, description FROM learning_outcomes ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records.learning_outcomes.write().extend(outcomes.into_iter().map(|r| {
        (
            r.id,
            LearningOutcome {
                id: r.id,
                assessment_id: r.assessment_id,
                description: r.description,
            },
        )
    }));

    let scores = sqlx::query_as::<_, OutcomeScoreRow>(
        "SELECT id, learning_outcome_id, abet_outcome_id, score, evidence_type
         FROM outcome_scores ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .outcome_scores
        .write()
        .extend(scores.into_iter().filter_map(|r| r.into_record().map(|s| (s.id, s))));

    Ok(())
}

#[derive(sqlx::FromRow)]
struct AssessmentRow {
    id: Uuid,
    name: String,
    date: chrono::NaiveDate,
    course_id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct ContinuousImprovementRow {
    id: Uuid,
    assessment_id: Uuid,
    score: f64,
    weight: i32,
    action_taken: String,
    effectiveness_measure: String,
}

impl ContinuousImprovementRow {
    fn into_record(self) -> Option<ContinuousImprovement> {
        let weight = match u32::try_from(self.weight) {
            Ok(w) => w,
            Err(_) => {
                tracing::warn!(id = %self.id, weight = self.weight, "skipping component row with negative weight");
                return None;
            }
        };
        Some(ContinuousImprovement {
            id: self.id,
            assessment_id: self.assessment_id,
            score: self.score,
            weight,
            action_taken: self.action_taken,
            effectiveness_measure: self.effectiveness_measure,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AcademicPerformanceRow {
    id: Uuid,
    assessment_id: Uuid,
    grade: i16,
    weight: i32,
    performance_type: String,
}

impl AcademicPerformanceRow {
    fn into_record(self) -> Option<AcademicPerformance> {
        let grade = match u8::try_from(self.grade).ok().filter(|g| *g <= 100) {
            Some(g) => g,
            None => {
                tracing::warn!(id = %self.id, grade = self.grade, "skipping component row with out-of-range grade");
                return None;
            }
        };
        let weight = match u32::try_from(self.weight) {
            Ok(w) => w,
            Err(_) => {
                tracing::warn!(id = %self.id, weight = self.weight, "skipping component row with negative weight");
                return None;
            }
        };
        Some(AcademicPerformance {
            id: self.id,
            assessment_id: self.assessment_id,
            grade,
            weight,
            performance_type: self.performance_type,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LearningOutcomeRow {
    id: Uuid,
    assessment_id: Uuid,
    description: String,
}

#[derive(sqlx::FromRow)]
struct OutcomeScoreRow {
    id: Uuid,
    learning_outcome_id: Uuid,
    abet_outcome_id: Uuid,
    score: i16,
    evidence_type: String,
}

impl OutcomeScoreRow {
    /// The stored level description is ignored; it is rederived from the
    /// score so the invariant holds even across hand-edited rows.
    fn into_record(self) -> Option<OutcomeScore> {
        let score = match u8::try_from(self.score).ok().and_then(|s| RubricScore::new(s).ok()) {
            Some(s) => s,
            None => {
                tracing::warn!(id = %self.id, score = self.score, "skipping outcome score row outside the rubric scale");
                return None;
            }
        };
        let evidence_type = match EvidenceType::parse(&self.evidence_type) {
            Some(e) => e,
            None => {
                tracing::warn!(id = %self.id, evidence_type = %self.evidence_type, "skipping outcome score row with unknown evidence type");
                return None;
            }
        };
        Some(OutcomeScore {
            id: self.id,
            learning_outcome_id: self.learning_outcome_id,
            abet_outcome_id: self.abet_outcome_id,
            score,
            evidence_type,
            level_description: score.level_description().to_string(),
        })
    }
}
