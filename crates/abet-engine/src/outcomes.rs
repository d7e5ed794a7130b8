//! # Catalog Outcome Aggregation
//!
//! For each ABET outcome in the catalog, averages every rubric score
//! recorded against it across the whole system and classifies the result
//! against the accreditation targets.

use serde::{Deserialize, Serialize};

use abet_core::{AbetOutcome, RubricScore};

/// An outcome whose aggregate percentage reaches this value counts as met
/// for the institutional "student outcomes met" metric.
pub const OUTCOME_MET_THRESHOLD: f64 = 75.0;

/// Standing of one catalog outcome against its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Aggregate percentage at or above 85.
    Exceeded,
    /// Aggregate percentage at or above 75.
    Met,
    /// Everything else, including outcomes with no evidence yet.
    Below,
}

impl OutcomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exceeded => "exceeded",
            Self::Met => "met",
            Self::Below => "below",
        }
    }

    fn for_percentage(percentage: f64) -> Self {
        if percentage >= 85.0 {
            Self::Exceeded
        } else if percentage >= OUTCOME_MET_THRESHOLD {
            Self::Met
        } else {
            Self::Below
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard row for one catalog outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeAggregate {
    pub label: String,
    pub description: String,
    /// Raw mean on the 1–4 scale (0 when no evidence exists).
    pub average_score: f64,
    /// `average_score / 4 · 100`.
    pub percentage: f64,
    /// The rubric ceiling, for gauge displays.
    pub target: f64,
    /// The met threshold, for gauge displays.
    pub target_score: f64,
    pub status: OutcomeStatus,
}

/// Aggregate every rubric score recorded against one catalog outcome.
///
/// No scores is valid data, not an error: the outcome reports 0/0/below.
pub fn aggregate_outcome(outcome: &AbetOutcome, scores: &[RubricScore]) -> OutcomeAggregate {
    let (average_score, percentage) = if scores.is_empty() {
        (0.0, 0.0)
    } else {
        let avg = scores.iter().map(|s| f64::from(s.as_u8())).sum::<f64>() / scores.len() as f64;
        (avg, (avg / 4.0) * 100.0)
    };

    OutcomeAggregate {
        label: outcome.label.clone(),
        description: outcome.description.clone(),
        average_score,
        percentage,
        target: 4.0,
        target_score: OUTCOME_MET_THRESHOLD,
        status: OutcomeStatus::for_percentage(percentage),
    }
}
