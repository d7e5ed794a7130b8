//! # Aggregation Layer
//!
//! Rolls per-assessment composite scores upward: institution-wide and
//! per-program means, and per-course summaries combining the average
//! score with ABET outcome coverage.
//!
//! Aggregation is resilient by construction — the caller feeds it whatever
//! scores it could compute (failed items arrive zeroed, not missing), and
//! empty inputs mean zero, never a division error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use abet_core::{Course, EvidenceType, RubricScore};

/// Arithmetic mean of composite scores; 0.0 for an empty slice.
pub fn mean_composite(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Program-level rollup over every assessment of every course in the
/// program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramAverage {
    pub average_score: f64,
    /// `average_score >= 90`, same bar as a single assessment.
    pub is_accredited: bool,
    pub assessment_count: usize,
}

impl ProgramAverage {
    /// Build from the program's composite scores.
    pub fn from_scores(scores: &[f64]) -> Self {
        let average_score = mean_composite(scores);
        Self {
            average_score,
            is_accredited: average_score >= crate::score::ACCREDITATION_THRESHOLD,
            assessment_count: scores.len(),
        }
    }
}

/// Two-dimensional course standing derived from average score and outcome
/// coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Excellent,
    Good,
    NeedsImprovement,
    NeedsReview,
    /// The course has no assessments at all.
    NeedsAssessment,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::NeedsImprovement => "needs_improvement",
            Self::NeedsReview => "needs_review",
            Self::NeedsAssessment => "needs_assessment",
        }
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a course that has at least one assessment.
///
/// The `needs_improvement` clause is an OR on purpose: either dimension
/// clearing its floor keeps the course out of `needs_review`.
pub fn classify_course(average_score: f64, outcome_coverage: f64) -> CourseStatus {
    if average_score >= 85.0 && outcome_coverage >= 80.0 {
        CourseStatus::Excellent
    } else if average_score >= 75.0 && outcome_coverage >= 60.0 {
        CourseStatus::Good
    } else if average_score >= 60.0 || outcome_coverage >= 40.0 {
        CourseStatus::NeedsImprovement
    } else {
        CourseStatus::NeedsReview
    }
}

/// One flattened piece of outcome evidence for a course: which catalog
/// outcome it touched, at what rubric level, with what evidence kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeEvidence {
    pub label: String,
    pub score: RubricScore,
    pub evidence_type: EvidenceType,
}

/// A catalog outcome as touched by a course, keeping the best observed
/// rubric score when the outcome is assessed more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedOutcome {
    pub label: String,
    /// Maximum rubric score observed for this outcome.
    pub score: u8,
    /// Met at rubric 3 ("Meets Expectations") or better.
    pub met: bool,
    pub evidence_type: EvidenceType,
}

/// Per-course assessment summary for the courses dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    /// Short display code derived from the course identifier.
    pub code: String,
    pub name: String,
    /// Instructor display name; "TBD" when unassigned.
    pub instructor: String,
    pub enrollment: usize,
    /// Labels of every catalog outcome touched by the course's evidence.
    pub outcomes: Vec<String>,
    pub mapped_outcomes: Vec<MappedOutcome>,
    /// Touched outcomes over the catalog size, as a percentage.
    pub outcome_coverage: f64,
    /// Mean composite score across the course's assessments.
    pub assessment_score: f64,
    pub status: CourseStatus,
}

/// Round to one decimal for display fields.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Summarize one course from its composite scores and flattened outcome
/// evidence.
///
/// `composite_scores` holds one entry per assessment (zeroed entries for
/// assessments that could not be scored — they still count toward the
/// mean). An empty slice means the course has no assessments and
/// short-circuits to `needs_assessment`.
pub fn summarize_course(
    course: &Course,
    enrollment: usize,
    composite_scores: &[f64],
    evidence: &[OutcomeEvidence],
    catalog_size: usize,
) -> CourseSummary {
    let code = format!("COURSE-{}", &course.id.simple().to_string()[..8]);
    let instructor = course
        .instructor
        .clone()
        .unwrap_or_else(|| "TBD".to_string());

    if composite_scores.is_empty() {
        return CourseSummary {
            code,
            name: course.name.clone(),
            instructor,
            enrollment,
            outcomes: Vec::new(),
            mapped_outcomes: Vec::new(),
            outcome_coverage: 0.0,
            assessment_score: 0.0,
            status: CourseStatus::NeedsAssessment,
        };
    }

    // Per label: keep the maximum observed score; evidence type follows
    // the first observation. BTreeMap keeps the output order stable.
    let mut by_label: BTreeMap<&str, (RubricScore, EvidenceType)> = BTreeMap::new();
    for row in evidence {
        by_label
            .entry(row.label.as_str())
            .and_modify(|(best, _)| {
                if row.score > *best {
                    *best = row.score;
                }
            })
            .or_insert((row.score, row.evidence_type));
    }

    let mapped_outcomes: Vec<MappedOutcome> = by_label
        .iter()
        .map(|(label, (score, evidence_type))| MappedOutcome {
            label: (*label).to_string(),
            score: score.as_u8(),
            met: score.as_u8() >= 3,
            evidence_type: *evidence_type,
        })
        .collect();

    let average_score = mean_composite(composite_scores);
    let outcome_coverage = (mapped_outcomes.len() as f64 / catalog_size.max(1) as f64) * 100.0;
    let status = classify_course(average_score, outcome_coverage);

    CourseSummary {
        code,
        name: course.name.clone(),
        instructor,
        enrollment,
        outcomes: mapped_outcomes.iter().map(|o| o.label.clone()).collect(),
        mapped_outcomes,
        outcome_coverage: round1(outcome_coverage),
        assessment_score: round1(average_score),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn course(instructor: Option<&str>) -> Course {
        Course {
            id: Uuid::new_v4(),
            name: "Thermodynamics".into(),
            description: "Energy and entropy".into(),
            credits: 3,
            program_id: Uuid::new_v4(),
            instructor: instructor.map(String::from),
        }
    }

    fn evidence(label: &str, score: u8, evidence_type: EvidenceType) -> OutcomeEvidence {
        OutcomeEvidence {
            label: label.into(),
            score: RubricScore::new(score).unwrap(),
            evidence_type,
        }
    }

    // ── mean_composite ──────────────────────────────────────────────

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean_composite(&[]), 0.0);
    }

    #[test]
    fn mean_of_scores() {
        assert_eq!(mean_composite(&[80.0, 90.0, 100.0]), 90.0);
    }

    // ── ProgramAverage ──────────────────────────────────────────────

    #[test]
    fn program_average_empty_is_zero_not_accredited() {
        let avg = ProgramAverage::from_scores(&[]);
        assert_eq!(avg.average_score, 0.0);
        assert!(!avg.is_accredited);
        assert_eq!(avg.assessment_count, 0);
    }

    #[test]
    fn program_average_accredited_at_ninety() {
        let avg = ProgramAverage::from_scores(&[88.0, 92.0]);
        assert_eq!(avg.average_score, 90.0);
        assert!(avg.is_accredited);
    }

    // ── classify_course ─────────────────────────────────────────────

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify_course(90.0, 85.0), CourseStatus::Excellent);
        assert_eq!(classify_course(78.0, 65.0), CourseStatus::Good);
        // OR clause: score clears 60 even though coverage is 10.
        assert_eq!(classify_course(62.0, 10.0), CourseStatus::NeedsImprovement);
        // OR clause the other way: coverage clears 40.
        assert_eq!(classify_course(30.0, 45.0), CourseStatus::NeedsImprovement);
        assert_eq!(classify_course(40.0, 20.0), CourseStatus::NeedsReview);
    }

    #[test]
    fn excellent_requires_both_dimensions() {
        // High score alone with weak coverage falls through to good/worse.
        assert_eq!(classify_course(95.0, 70.0), CourseStatus::Good);
    }

    // ── summarize_course ────────────────────────────────────────────

    #[test]
    fn no_assessments_needs_assessment() {
        let summary = summarize_course(&course(None), 12, &[], &[], 7);
        assert_eq!(summary.status, CourseStatus::NeedsAssessment);
        assert_eq!(summary.assessment_score, 0.0);
        assert_eq!(summary.outcome_coverage, 0.0);
        assert!(summary.mapped_outcomes.is_empty());
        assert_eq!(summary.instructor, "TBD");
    }

    #[test]
    fn repeated_outcome_keeps_maximum_score() {
        let rows = vec![
            evidence("SO2", 2, EvidenceType::Direct),
            evidence("SO2", 4, EvidenceType::Indirect),
            evidence("SO5", 3, EvidenceType::Direct),
        ];
        let summary = summarize_course(&course(Some("L. Osei")), 30, &[82.0], &rows, 7);
        assert_eq!(summary.mapped_outcomes.len(), 2);
        let so2 = &summary.mapped_outcomes[0];
        assert_eq!(so2.label, "SO2");
        assert_eq!(so2.score, 4);
        assert!(so2.met);
        // Evidence type follows the first observation of the label.
        assert_eq!(so2.evidence_type, EvidenceType::Direct);
    }

    #[test]
    fn coverage_counts_distinct_outcomes_against_catalog() {
        let rows = vec![
            evidence("SO1", 3, EvidenceType::Direct),
            evidence("SO1", 2, EvidenceType::Direct),
            evidence("SO4", 4, EvidenceType::Indirect),
        ];
        // 2 distinct of 7 → 28.6 after display rounding.
        let summary = summarize_course(&course(None), 0, &[70.0], &rows, 7);
        assert_eq!(summary.outcome_coverage, 28.6);
        assert_eq!(summary.outcomes, vec!["SO1".to_string(), "SO4".to_string()]);
    }

    #[test]
    fn below_rubric_three_is_not_met() {
        let rows = vec![evidence("SO6", 2, EvidenceType::Direct)];
        let summary = summarize_course(&course(None), 5, &[65.0], &rows, 7);
        assert!(!summary.mapped_outcomes[0].met);
    }

    #[test]
    fn status_uses_unrounded_values() {
        // 6/7 coverage = 85.71…%, score 85 → excellent even though the
        // displayed coverage rounds to 85.7.
        let rows: Vec<OutcomeEvidence> = (1..=6)
            .map(|i| evidence(&format!("SO{i}"), 4, EvidenceType::Direct))
            .collect();
        let summary = summarize_course(&course(None), 0, &[85.0], &rows, 7);
        assert_eq!(summary.status, CourseStatus::Excellent);
    }

    #[test]
    fn course_status_serde_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&CourseStatus::NeedsAssessment).unwrap(),
            "\"needs_assessment\""
        );
    }
}
