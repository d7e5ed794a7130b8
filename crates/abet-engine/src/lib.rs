//! # abet-engine — Scoring, Aggregation & Compliance
//!
//! The computational core of the accreditation stack:
//!
//! - **Scoring** ([`score`]): one assessment's components → one normalized
//!   composite score. This is the single scoring code path; every dashboard
//!   and rollup goes through it.
//! - **Aggregation** ([`aggregate`]): means across assessments, program
//!   averages, and per-course summaries with outcome coverage and status
//!   classification.
//! - **Outcome rollups** ([`outcomes`]): catalog-outcome averages,
//!   percentages, and exceeded/met/below status.
//! - **Compliance** ([`compliance`]): the four institutional KPIs and the
//!   per-method completion/score compliance dashboard.
//!
//! ## Crate Policy
//!
//! - Pure and synchronous: every function computes from the data it is
//!   handed and returns a fresh result. No I/O, no caching, no clocks.
//!   Calling anything here twice on the same inputs yields identical
//!   output.
//! - Empty data is never an error. Zero components, zero assessments, and
//!   zero records all produce zeroed results with the appropriate status.
//! - Zero-weight component groups are excluded from composites, never
//!   divided by.

pub mod aggregate;
pub mod compliance;
pub mod outcomes;
pub mod score;

pub use aggregate::{
    classify_course, mean_composite, summarize_course, CourseStatus, CourseSummary, MappedOutcome,
    OutcomeEvidence, ProgramAverage,
};
pub use compliance::{
    assessment_data_metric, faculty_training_metric, methods_dashboard, outcomes_met_metric,
    summarize_method, syllabi_metric, ComplianceMetric, MethodSummary, MethodsDashboard,
    MetricStatus, MetricTarget,
};
pub use outcomes::{aggregate_outcome, OutcomeAggregate, OutcomeStatus, OUTCOME_MET_THRESHOLD};
pub use score::{score_components, ScoreResult, ACCREDITATION_THRESHOLD};
