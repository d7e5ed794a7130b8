//! # Validation Errors
//!
//! Constructor-time validation failures for domain values. The API layer
//! maps these to 422 responses.

use thiserror::Error;

/// A domain value failed constructor-time validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rubric scores are integers on the 1–4 scale.
    #[error("rubric score must be between 1 and 4, got {0}")]
    InvalidRubricScore(u8),

    /// Academic-performance grades are integer percentages.
    #[error("grade must be between 0 and 100, got {0}")]
    InvalidGrade(u16),

    /// Academic years are written as a "YYYY-YYYY" span.
    #[error("invalid academic year {0:?}, expected the form \"2024-2025\"")]
    InvalidAcademicYear(String),

    /// Semesters are free-form but must not be blank.
    #[error("semester must not be empty")]
    EmptySemester,

    /// A required name or description field was blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
