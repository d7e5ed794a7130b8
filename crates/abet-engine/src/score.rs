//! # Assessment Scoring
//!
//! Rolls one assessment's heterogeneous components into a single
//! normalized composite score.
//!
//! ## Algorithm
//!
//! Three component groups are normalized independently:
//!
//! 1. **Continuous improvement** — weighted average of effectiveness
//!    scores: `Σ(score·weight) / Σ(weight)`.
//! 2. **Academic performance** — the same weighted average over integer
//!    grades.
//! 3. **Learning outcomes** — unweighted mean of every rubric score
//!    converted to a percentage (`score/4 · 100`). Every individual
//!    outcome score counts equally, regardless of which learning outcome
//!    or catalog outcome it belongs to.
//!
//! The composite is the arithmetic mean of only the groups that had data:
//! a group with zero total weight (or zero rubric scores) is excluded
//! rather than diluting the mean with a zero. An assessment with no
//! components at all scores 0 and is not accredited — never an error.

use serde::{Deserialize, Serialize};

use abet_core::{AcademicPerformance, ContinuousImprovement, OutcomeScore};

/// Composite score at or above this value marks the assessment as meeting
/// the accreditation bar.
pub const ACCREDITATION_THRESHOLD: f64 = 90.0;

/// The scoring result for one assessment.
///
/// One fixed shape with snake_case fields; per-group sub-scores are 0.0
/// when the group had no data (the composite already excludes them).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Normalized 0–100 composite across the contributing groups.
    pub composite_score: f64,
    pub continuous_improvement_score: f64,
    pub academic_performance_score: f64,
    pub learning_outcome_score: f64,
    /// `composite_score >= 90`.
    pub is_accredited: bool,
}

impl ScoreResult {
    /// The result for an assessment with no usable data: all zeros, not
    /// accredited. Also the fail-soft value when scoring cannot proceed.
    pub fn zeroed() -> Self {
        Self {
            composite_score: 0.0,
            continuous_improvement_score: 0.0,
            academic_performance_score: 0.0,
            learning_outcome_score: 0.0,
            is_accredited: false,
        }
    }
}

/// Weighted average over `(score, weight)` pairs.
///
/// Returns `None` when the total weight is zero — the caller excludes the
/// group instead of dividing by zero.
fn weighted_average<I>(items: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, u32)>,
{
    let mut weighted_sum = 0.0;
    let mut weight_total = 0u64;
    for (score, weight) in items {
        weighted_sum += score * f64::from(weight);
        weight_total += u64::from(weight);
    }
    if weight_total == 0 {
        return None;
    }
    Some(weighted_sum / weight_total as f64)
}

/// Unweighted mean of rubric scores expressed as percentages.
///
/// `None` when there are no scores.
fn rubric_mean(scores: &[OutcomeScore]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().map(|s| s.score.as_percentage()).sum();
    Some(sum / scores.len() as f64)
}

/// Score one assessment from its current components.
///
/// This is the single scoring code path: deterministic, idempotent, and
/// tolerant of empty groups. `outcome_scores` is the flattened set of
/// rubric scores across all of the assessment's learning outcomes.
pub fn score_components(
    continuous_improvements: &[ContinuousImprovement],
    academic_performances: &[AcademicPerformance],
    outcome_scores: &[OutcomeScore],
) -> ScoreResult {
    for component in continuous_improvements {
        if !(0.0..=100.0).contains(&component.score) {
            // Write paths validate the band; rows inserted out-of-band
            // may not be. They still count, but must be visible.
            tracing::warn!(
                component = %component.id,
                score = component.score,
                "continuous-improvement score outside the 0-100 band"
            );
        }
    }

    let ci = weighted_average(
        continuous_improvements
            .iter()
            .map(|c| (c.score, c.weight)),
    );
    let ap = weighted_average(
        academic_performances
            .iter()
            .map(|a| (f64::from(a.grade), a.weight)),
    );
    let lo = rubric_mean(outcome_scores);

    let contributing: Vec<f64> = [ci, ap, lo].into_iter().flatten().collect();
    let composite_score = if contributing.is_empty() {
        0.0
    } else {
        contributing.iter().sum::<f64>() / contributing.len() as f64
    };

    ScoreResult {
        composite_score,
        continuous_improvement_score: ci.unwrap_or(0.0),
        academic_performance_score: ap.unwrap_or(0.0),
        learning_outcome_score: lo.unwrap_or(0.0),
        is_accredited: composite_score >= ACCREDITATION_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abet_core::{EvidenceType, RubricScore};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn ci(score: f64, weight: u32) -> ContinuousImprovement {
        ContinuousImprovement {
            id: Uuid::new_v4(),
            assessment_id: Uuid::new_v4(),
            score,
            weight,
            action_taken: "revise lab handouts".into(),
            effectiveness_measure: "re-run rubric next term".into(),
        }
    }

    fn ap(grade: u8, weight: u32) -> AcademicPerformance {
        AcademicPerformance {
            id: Uuid::new_v4(),
            assessment_id: Uuid::new_v4(),
            grade,
            weight,
            performance_type: "midterm".into(),
        }
    }

    fn os(score: u8) -> OutcomeScore {
        OutcomeScore::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            RubricScore::new(score).unwrap(),
            EvidenceType::Direct,
        )
    }

    // ── Empty and single-group behavior ─────────────────────────────

    #[test]
    fn no_components_scores_zero_not_accredited() {
        let result = score_components(&[], &[], &[]);
        assert_eq!(result, ScoreResult::zeroed());
    }

    #[test]
    fn academic_performance_only_equals_its_weighted_average() {
        // (80·40 + 90·60) / 100 = 86; single contributing group.
        let result = score_components(&[], &[ap(80, 40), ap(90, 60)], &[]);
        assert_eq!(result.academic_performance_score, 86.0);
        assert_eq!(result.composite_score, 86.0);
        assert!(!result.is_accredited);
        // Excluded groups report zero without diluting the composite.
        assert_eq!(result.continuous_improvement_score, 0.0);
        assert_eq!(result.learning_outcome_score, 0.0);
    }

    #[test]
    fn outcome_scores_only_uses_unweighted_mean() {
        // Rubric 4 → 100%, rubric 2 → 50%; mean = 75.
        let result = score_components(&[], &[], &[os(4), os(2)]);
        assert_eq!(result.learning_outcome_score, 75.0);
        assert_eq!(result.composite_score, 75.0);
    }

    #[test]
    fn zero_weight_group_is_excluded_not_zeroed_in() {
        // CI group exists but carries no weight; only AP contributes.
        let result = score_components(&[ci(50.0, 0)], &[ap(92, 1)], &[]);
        assert_eq!(result.continuous_improvement_score, 0.0);
        assert_eq!(result.composite_score, 92.0);
        assert!(result.is_accredited);
    }

    // ── Multi-group composition ─────────────────────────────────────

    #[test]
    fn composite_is_mean_of_contributing_groups() {
        let result = score_components(
            &[ci(80.0, 1)],
            &[ap(90, 1)],
            &[os(4)], // 100%
        );
        assert_eq!(result.composite_score, (80.0 + 90.0 + 100.0) / 3.0);
        assert_eq!(result.is_accredited, result.composite_score >= 90.0);
    }

    #[test]
    fn two_of_three_groups_average_over_two() {
        let result = score_components(&[ci(70.0, 2)], &[], &[os(3)]); // 70 and 75
        assert_eq!(result.composite_score, 72.5);
    }

    #[test]
    fn accreditation_boundary_is_inclusive() {
        let result = score_components(&[], &[ap(90, 1)], &[]);
        assert_eq!(result.composite_score, 90.0);
        assert!(result.is_accredited);
    }

    // ── Determinism and invariance ──────────────────────────────────

    #[test]
    fn scoring_is_idempotent() {
        let cis = [ci(66.0, 3), ci(82.0, 7)];
        let aps = [ap(71, 2), ap(88, 5)];
        let scores = [os(1), os(3), os(4)];
        let first = score_components(&cis, &aps, &scores);
        let second = score_components(&cis, &aps, &scores);
        assert_eq!(first, second);
    }

    proptest! {
        /// Same-weight components can be reordered without changing the
        /// group average.
        #[test]
        fn weighted_average_reorder_invariant(
            grades in proptest::collection::vec(0u8..=100, 1..8),
        ) {
            let components: Vec<AcademicPerformance> =
                grades.iter().map(|&g| ap(g, 1)).collect();
            let mut reversed = components.clone();
            reversed.reverse();

            let forward = score_components(&[], &components, &[]);
            let backward = score_components(&[], &reversed, &[]);
            prop_assert!((forward.composite_score - backward.composite_score).abs() < 1e-9);
        }

        /// The composite never leaves the 0–100 range for in-range inputs.
        #[test]
        fn composite_stays_normalized(
            ci_scores in proptest::collection::vec((0.0f64..=100.0, 0u32..5), 0..4),
            ap_grades in proptest::collection::vec((0u8..=100, 0u32..5), 0..4),
            rubric in proptest::collection::vec(1u8..=4, 0..6),
        ) {
            let cis: Vec<ContinuousImprovement> =
                ci_scores.iter().map(|&(s, w)| ci(s, w)).collect();
            let aps: Vec<AcademicPerformance> =
                ap_grades.iter().map(|&(g, w)| ap(g, w)).collect();
            let scores: Vec<OutcomeScore> = rubric.iter().map(|&r| os(r)).collect();

            let result = score_components(&cis, &aps, &scores);
            prop_assert!(result.composite_score >= 0.0);
            prop_assert!(result.composite_score <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn score_result_serde_uses_snake_case_fields() {
        let json = serde_json::to_string(&ScoreResult::zeroed()).unwrap();
        assert!(json.contains("composite_score"));
        assert!(json.contains("continuous_improvement_score"));
        assert!(json.contains("is_accredited"));
    }
}
