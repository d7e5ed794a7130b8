//! # abet-core — Domain Types for the ABET Accreditation Stack
//!
//! The bottom of the dependency DAG. Defines the shared vocabulary used by
//! the scoring engine and the API layer:
//!
//! - **Rubric scale** ([`rubric`]): the 1–4 rubric score with its fixed
//!   level-description map, and direct/indirect evidence types.
//! - **Components** ([`component`]): assessments and their three component
//!   kinds (continuous improvement, academic performance, learning-outcome
//!   rubric scores).
//! - **Catalog** ([`catalog`]): the fixed ABET student-outcome catalog with
//!   the standard SO1–SO7 seed.
//! - **Methods** ([`method`]): the assessment-method catalog and per-course
//!   method records tracked against completion/score targets.
//! - **Institution** ([`institution`]): departments, programs, courses,
//!   faculty, enrollments, syllabi, and training records.
//! - **Terms** ([`term`]): validated academic-year and semester values.
//!
//! ## Crate Policy
//!
//! - No I/O, no async, no framework types. Everything here is plain data
//!   with serde derives and constructor-time validation.
//! - Derived fields (the outcome-score level description) are recomputed by
//!   constructors and setters — a stored value is never trusted over the
//!   derivation.

pub mod catalog;
pub mod component;
pub mod error;
pub mod institution;
pub mod method;
pub mod rubric;
pub mod term;

pub use catalog::AbetOutcome;
pub use component::{
    AcademicPerformance, Assessment, ContinuousImprovement, LearningOutcome, OutcomeScore,
};
pub use error::ValidationError;
pub use institution::{
    Course, CourseSyllabus, Department, Enrollment, Faculty, FacultyTraining, Program,
};
pub use method::{AssessmentMethod, CourseMethodRecord};
pub use rubric::{level_description_for, EvidenceType, RubricScore};
pub use term::{AcademicYear, Semester};
