//! # Compliance Calculators
//!
//! Two families of compliance rollups:
//!
//! - **Institutional metrics** — four independent KPIs (syllabi updated,
//!   assessment data collected, student outcomes met, faculty training
//!   complete), each a percentage with an excellent/good/warning/critical
//!   tier.
//! - **Assessment-method compliance** — per-method completion and score
//!   rates against configured targets, rolled into an overall dashboard
//!   with direct/indirect sub-rates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use abet_core::{AssessmentMethod, CourseMethodRecord, EvidenceType};

/// Tier of an institutional compliance percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl MetricStatus {
    /// Tier thresholds: >=95 excellent, >=80 good, >=60 warning.
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 95.0 {
            Self::Excellent
        } else if percentage >= 80.0 {
            Self::Good
        } else if percentage >= 60.0 {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display target of a metric: a flat percentage, or a count fraction like
/// "6/7" for metrics whose target is expressed in catalog entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricTarget {
    Percent(f64),
    Fraction { met: usize, total: usize },
}

impl Serialize for MetricTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Percent(value) => serializer.serialize_f64(*value),
            Self::Fraction { met, total } => {
                serializer.serialize_str(&format!("{met}/{total}"))
            }
        }
    }
}

/// One institutional compliance metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceMetric {
    pub name: &'static str,
    pub percentage: f64,
    pub current: usize,
    pub total: usize,
    pub target: MetricTarget,
    pub status: MetricStatus,
}

/// `current / total · 100`, guarding the empty denominator.
fn ratio(current: usize, total: usize) -> f64 {
    (current as f64 / total.max(1) as f64) * 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Courses whose syllabus is current for the configured academic year.
pub fn syllabi_metric(updated: usize, total_courses: usize) -> ComplianceMetric {
    let percentage = ratio(updated, total_courses);
    ComplianceMetric {
        name: "Course Syllabi Updated",
        percentage: round1(percentage),
        current: updated,
        total: total_courses,
        target: MetricTarget::Percent(100.0),
        status: MetricStatus::for_percentage(percentage),
    }
}

/// Assessment-data collection health.
///
/// The percentage IS the mean composite score across assessments that
/// scored above zero — a score is already on the 0–100 scale, so it is
/// not divided again. `current` counts the contributing assessments,
/// `total` all assessments.
pub fn assessment_data_metric(composite_scores: &[f64]) -> ComplianceMetric {
    let contributing: Vec<f64> = composite_scores
        .iter()
        .copied()
        .filter(|&s| s > 0.0)
        .collect();
    let percentage = crate::aggregate::mean_composite(&contributing);
    ComplianceMetric {
        name: "Assessment Data Collected",
        percentage: round1(percentage),
        current: contributing.len(),
        total: composite_scores.len(),
        target: MetricTarget::Percent(90.0),
        status: MetricStatus::for_percentage(percentage),
    }
}

/// Catalog outcomes whose aggregate percentage reaches the met threshold.
/// The displayed target is 80% of the catalog as a count fraction.
pub fn outcomes_met_metric(met: usize, total_outcomes: usize) -> ComplianceMetric {
    let percentage = ratio(met, total_outcomes);
    ComplianceMetric {
        name: "Student Outcomes Met",
        percentage: round1(percentage),
        current: met,
        total: total_outcomes,
        target: MetricTarget::Fraction {
            met: (total_outcomes as f64 * 0.8) as usize,
            total: total_outcomes,
        },
        status: MetricStatus::for_percentage(percentage),
    }
}

/// Distinct faculty with a completed training record for the academic year.
pub fn faculty_training_metric(trained: usize, total_faculty: usize) -> ComplianceMetric {
    let percentage = ratio(trained, total_faculty);
    ComplianceMetric {
        name: "Faculty Training Complete",
        percentage: round1(percentage),
        current: trained,
        total: total_faculty,
        target: MetricTarget::Percent(95.0),
        status: MetricStatus::for_percentage(percentage),
    }
}

// ---------------------------------------------------------------------------
// Assessment-method compliance
// ---------------------------------------------------------------------------

/// One method's compliance against its configured targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub name: String,
    pub display_name: String,
    pub assessment_type: EvidenceType,
    /// Distinct courses with any record for this method this semester.
    pub courses: usize,
    pub completion_rate: f64,
    /// Mean of recorded scores among completed records (4-point scale).
    pub avg_score: f64,
    pub target_completion: f64,
    pub target_score: f64,
    pub is_compliant: bool,
}

/// Summarize one assessment method over its records for the semester
/// under evaluation (the caller filters by semester).
///
/// Completion counts distinct *courses*, not records: a course with three
/// records and one completed counts as completed. Null scores are
/// excluded from the average rather than treated as zero.
pub fn summarize_method(
    method: &AssessmentMethod,
    records: &[CourseMethodRecord],
) -> MethodSummary {
    let all_courses: BTreeSet<_> = records.iter().map(|r| r.course_id).collect();
    let completed_courses: BTreeSet<_> = records
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.course_id)
        .collect();

    let completion_rate = ratio(completed_courses.len(), all_courses.len());

    let scores: Vec<f64> = records
        .iter()
        .filter(|r| r.completed)
        .filter_map(|r| r.score)
        .collect();
    let avg_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    let is_compliant =
        completion_rate >= method.target_completion_rate && avg_score >= method.target_score;

    MethodSummary {
        name: method.name.clone(),
        display_name: method.display_name.clone(),
        assessment_type: method.assessment_type,
        courses: all_courses.len(),
        completion_rate: round1(completion_rate),
        avg_score: round1(avg_score),
        target_completion: method.target_completion_rate,
        target_score: method.target_score,
        is_compliant,
    }
}

/// The assessment-method compliance dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodsDashboard {
    pub overall_compliance_rate: f64,
    pub direct_assessment_compliance: f64,
    pub indirect_assessment_compliance: f64,
    pub total_methods: usize,
    pub compliant_methods: usize,
    pub methods: Vec<MethodSummary>,
}

fn segment_rate(methods: &[&MethodSummary]) -> f64 {
    let compliant = methods.iter().filter(|m| m.is_compliant).count();
    ratio(compliant, methods.len())
}

/// Roll per-method summaries into the dashboard. An empty catalog yields
/// an all-zero dashboard, not an error.
pub fn methods_dashboard(methods: Vec<MethodSummary>) -> MethodsDashboard {
    if methods.is_empty() {
        return MethodsDashboard {
            overall_compliance_rate: 0.0,
            direct_assessment_compliance: 0.0,
            indirect_assessment_compliance: 0.0,
            total_methods: 0,
            compliant_methods: 0,
            methods,
        };
    }

    let compliant_methods = methods.iter().filter(|m| m.is_compliant).count();
    let overall = ratio(compliant_methods, methods.len());

    let direct: Vec<&MethodSummary> = methods
        .iter()
        .filter(|m| m.assessment_type == EvidenceType::Direct)
        .collect();
    let indirect: Vec<&MethodSummary> = methods
        .iter()
        .filter(|m| m.assessment_type == EvidenceType::Indirect)
        .collect();

    MethodsDashboard {
        overall_compliance_rate: round1(overall),
        direct_assessment_compliance: round1(segment_rate(&direct)),
        indirect_assessment_compliance: round1(segment_rate(&indirect)),
        total_methods: methods.len(),
        compliant_methods,
        methods,
    }
}
