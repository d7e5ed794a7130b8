//! # Assessment-Method Catalog
//!
//! Configured assessment methods (exam questions, project rubrics, student
//! surveys, alumni feedback) each carry a target completion rate and a
//! target rubric score. Per-course-per-semester records track actual
//! completion and scores against those targets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rubric::EvidenceType;
use crate::term::Semester;

/// A configured assessment method with its compliance targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMethod {
    pub id: Uuid,
    /// Stable slug, e.g. "exam_questions".
    pub name: String,
    /// Human-readable display name, e.g. "Exam Questions".
    pub display_name: String,
    pub assessment_type: EvidenceType,
    pub description: String,
    /// Target completion rate, percent of courses (0–100).
    pub target_completion_rate: f64,
    /// Target average score on the 4-point scale.
    pub target_score: f64,
    pub is_active: bool,
}

impl AssessmentMethod {
    /// The standard method catalog used by new deployments.
    pub fn standard_methods() -> Vec<Self> {
        let seed: [(&str, &str, EvidenceType, f64, f64); 4] = [
            ("exam_questions", "Exam Questions", EvidenceType::Direct, 85.0, 3.2),
            ("project_rubrics", "Project Rubrics", EvidenceType::Direct, 90.0, 3.4),
            ("student_surveys", "Student Surveys", EvidenceType::Indirect, 75.0, 3.1),
            ("alumni_feedback", "Alumni Feedback", EvidenceType::Indirect, 70.0, 3.3),
        ];
        seed.iter()
            .map(
                |&(name, display, assessment_type, target_completion, target_score)| Self {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    display_name: display.to_string(),
                    assessment_type,
                    description: display.to_string(),
                    target_completion_rate: target_completion,
                    target_score,
                    is_active: true,
                },
            )
            .collect()
    }
}

/// One course's use of an assessment method in a given semester.
///
/// `score` stays `None` until results are recorded; only completed records
/// with a recorded score contribute to the method's average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMethodRecord {
    pub id: Uuid,
    pub course_id: Uuid,
    pub method_id: Uuid,
    pub semester: Semester,
    pub completed: bool,
    /// Recorded average score on the 4-point scale, when available.
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_methods_split_direct_and_indirect() {
        let methods = AssessmentMethod::standard_methods();
        assert_eq!(methods.len(), 4);
        let direct = methods
            .iter()
            .filter(|m| m.assessment_type == EvidenceType::Direct)
            .count();
        assert_eq!(direct, 2);
        assert!(methods.iter().all(|m| m.is_active));
    }

    #[test]
    fn standard_methods_targets_match_catalog() {
        let methods = AssessmentMethod::standard_methods();
        let exam = methods.iter().find(|m| m.name == "exam_questions").unwrap();
        assert_eq!(exam.target_completion_rate, 85.0);
        assert_eq!(exam.target_score, 3.2);
        assert_eq!(exam.display_name, "Exam Questions");
    }
}
