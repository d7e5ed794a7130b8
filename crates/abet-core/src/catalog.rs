//! # ABET Outcome Catalog
//!
//! The fixed catalog of student learning outcomes that rubric scores
//! reference. Catalog entries exist independently of any assessment.
//!
//! The standard seed is the seven ABET engineering student outcomes
//! (criteria 3.1–3.7), labeled `SO1`–`SO7`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One catalog entry: a short label plus the full outcome statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbetOutcome {
    pub id: Uuid,
    /// Short display label, e.g. "SO3".
    pub label: String,
    pub description: String,
}

impl AbetOutcome {
    /// Create a catalog entry with a fresh identifier.
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            description: description.into(),
        }
    }

    /// The standard seven-outcome seed used by new deployments.
    pub fn standard_catalog() -> Vec<Self> {
        [
            "An ability to identify, formulate, and solve complex engineering problems \
             by applying principles of engineering, science, and mathematics",
            "An ability to apply engineering design to produce solutions that meet \
             specified needs with consideration of public health, safety, and welfare",
            "An ability to communicate effectively with a range of audiences",
            "An ability to recognize ethical and professional responsibilities in \
             engineering situations and make informed judgments",
            "An ability to function effectively on a team whose members together \
             provide leadership and create a collaborative and inclusive environment",
            "An ability to develop and conduct appropriate experimentation, analyze \
             and interpret data, and use engineering judgment to draw conclusions",
            "An ability to acquire and apply new knowledge as needed, using \
             appropriate learning strategies",
        ]
        .iter()
        .enumerate()
        .map(|(i, description)| Self::new(format!("SO{}", i + 1), *description))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_seven_outcomes() {
        let catalog = AbetOutcome::standard_catalog();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog[0].label, "SO1");
        assert_eq!(catalog[6].label, "SO7");
    }

    #[test]
    fn standard_catalog_labels_are_distinct() {
        let catalog = AbetOutcome::standard_catalog();
        let mut labels: Vec<_> = catalog.iter().map(|o| o.label.as_str()).collect();
        labels.dedup();
        assert_eq!(labels.len(), 7);
    }
}
