//! # Rubric Scale & Evidence Types
//!
//! The 1–4 rubric scale used for learning-outcome evidence, the fixed
//! level-description map derived from it, and the direct/indirect evidence
//! classification.
//!
//! ## Level Descriptions
//!
//! The description is a pure function of the score:
//!
//! ```text
//! 4 → "Exceeds Expectations"
//! 3 → "Meets Expectations"
//! 2 → "Approaching Expectations"
//! 1 → "Does Not Meet Expectations"
//! _ → "Unspecified"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Level description for any raw integer, including values outside the
/// 1–4 scale (legacy rows can carry them; they render as "Unspecified").
pub fn level_description_for(raw: u8) -> &'static str {
    match raw {
        4 => "Exceeds Expectations",
        3 => "Meets Expectations",
        2 => "Approaching Expectations",
        1 => "Does Not Meet Expectations",
        _ => "Unspecified",
    }
}

// -- Validating Deserialize for RubricScore -----------------------------------

impl<'de> Deserialize<'de> for RubricScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// An integer rubric rating on the 1–4 scale.
///
/// Valid by construction: [`RubricScore::new`] rejects anything outside
/// the scale, so a held value always has a real level description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RubricScore(u8);

impl RubricScore {
    /// Create a rubric score, validating the 1–4 range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRubricScore`] for 0 or anything
    /// above 4.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(1..=4).contains(&value) {
            return Err(ValidationError::InvalidRubricScore(value));
        }
        Ok(Self(value))
    }

    /// The raw 1–4 value.
    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// The fixed level description for this score.
    pub fn level_description(self) -> &'static str {
        level_description_for(self.0)
    }

    /// The score expressed as a percentage of the 4-point scale.
    pub fn as_percentage(self) -> f64 {
        (f64::from(self.0) / 4.0) * 100.0
    }
}

impl std::fmt::Display for RubricScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a piece of outcome evidence measures student work directly
/// (exams, project rubrics) or indirectly (surveys, alumni feedback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    Direct,
    Indirect,
}

impl EvidenceType {
    /// The snake_case wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Indirect => "indirect",
        }
    }

    /// Parse the snake_case representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Self::Direct),
            "indirect" => Some(Self::Indirect),
            _ => None,
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_description_fixed_map() {
        assert_eq!(level_description_for(4), "Exceeds Expectations");
        assert_eq!(level_description_for(3), "Meets Expectations");
        assert_eq!(level_description_for(2), "Approaching Expectations");
        assert_eq!(level_description_for(1), "Does Not Meet Expectations");
    }

    #[test]
    fn level_description_out_of_scale_is_unspecified() {
        for raw in [0u8, 5, 6, 100, u8::MAX] {
            assert_eq!(level_description_for(raw), "Unspecified");
        }
    }

    #[test]
    fn rubric_score_accepts_the_scale() {
        for value in 1..=4u8 {
            let score = RubricScore::new(value).unwrap();
            assert_eq!(score.as_u8(), value);
        }
    }

    #[test]
    fn rubric_score_rejects_out_of_scale() {
        assert_eq!(
            RubricScore::new(0),
            Err(ValidationError::InvalidRubricScore(0))
        );
        assert_eq!(
            RubricScore::new(5),
            Err(ValidationError::InvalidRubricScore(5))
        );
    }

    #[test]
    fn rubric_score_percentage() {
        assert_eq!(RubricScore::new(4).unwrap().as_percentage(), 100.0);
        assert_eq!(RubricScore::new(2).unwrap().as_percentage(), 50.0);
        assert_eq!(RubricScore::new(1).unwrap().as_percentage(), 25.0);
    }

    #[test]
    fn rubric_score_deserialize_validates() {
        let ok: RubricScore = serde_json::from_str("3").unwrap();
        assert_eq!(ok.as_u8(), 3);
        assert!(serde_json::from_str::<RubricScore>("9").is_err());
    }

    #[test]
    fn evidence_type_roundtrip() {
        for et in [EvidenceType::Direct, EvidenceType::Indirect] {
            assert_eq!(EvidenceType::parse(et.as_str()), Some(et));
        }
        assert_eq!(EvidenceType::parse("survey"), None);
    }

    #[test]
    fn evidence_type_serde_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&EvidenceType::Direct).unwrap(),
            "\"direct\""
        );
    }
}
