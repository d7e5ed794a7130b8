//! # Assessments & Component Records
//!
//! An [`Assessment`] belongs to a course and owns three component kinds:
//! continuous-improvement actions, academic-performance grades, and
//! learning outcomes whose [`OutcomeScore`] rows map them onto the ABET
//! outcome catalog.
//!
//! Component deletion follows the assessment (cascade); the composite score
//! is always recomputed from whatever components currently exist.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::rubric::{EvidenceType, RubricScore};

/// A single assessment event for a course (an exam, a project review, a
/// survey round).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    /// Create a new assessment record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        course_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyField("assessment name"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            date,
            course_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A continuous-improvement action attached to an assessment, scored for
/// its measured effectiveness and weighted within its group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousImprovement {
    pub id: Uuid,
    pub assessment_id: Uuid,
    /// Effectiveness score on the 0–100 scale.
    pub score: f64,
    /// Non-negative weight within the continuous-improvement group.
    pub weight: u32,
    pub action_taken: String,
    pub effectiveness_measure: String,
}

/// An academic-performance record (a graded artifact) attached to an
/// assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicPerformance {
    pub id: Uuid,
    pub assessment_id: Uuid,
    /// Integer grade, 0–100.
    pub grade: u8,
    /// Non-negative weight within the academic-performance group.
    pub weight: u32,
    /// Descriptive kind of graded work ("midterm", "capstone report").
    pub performance_type: String,
}

impl AcademicPerformance {
    /// Validate a raw grade value into the 0–100 range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGrade`] above 100.
    pub fn validate_grade(raw: u16) -> Result<u8, ValidationError> {
        if raw > 100 {
            return Err(ValidationError::InvalidGrade(raw));
        }
        Ok(raw as u8)
    }
}

/// A learning outcome measured by an assessment. Its mapping onto the ABET
/// catalog is carried by [`OutcomeScore`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningOutcome {
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub description: String,
}

/// One rubric rating linking a learning outcome to a catalog ABET outcome.
///
/// `level_description` is derived from `score` and recomputed on every
/// write — see [`OutcomeScore::new`] and [`OutcomeScore::set_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeScore {
    pub id: Uuid,
    pub learning_outcome_id: Uuid,
    pub abet_outcome_id: Uuid,
    pub score: RubricScore,
    pub evidence_type: EvidenceType,
    /// Derived display field; always consistent with `score`.
    pub level_description: String,
}

impl OutcomeScore {
    /// Create an outcome score with its level description derived.
    pub fn new(
        learning_outcome_id: Uuid,
        abet_outcome_id: Uuid,
        score: RubricScore,
        evidence_type: EvidenceType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            learning_outcome_id,
            abet_outcome_id,
            score,
            evidence_type,
            level_description: score.level_description().to_string(),
        }
    }

    /// Update the rubric score, rederiving the level description.
    pub fn set_score(&mut self, score: RubricScore) {
        self.score = score;
        self.level_description = score.level_description().to_string();
    }
}
