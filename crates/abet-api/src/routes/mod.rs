//! # API Route Modules
//!
//! Route modules for the accreditation API surface:
//!
//! - `dashboard` — Institution statistics, the four compliance metrics,
//!   and assessment-method compliance.
//! - `assessments` — Assessment creation, component writes, and the
//!   per-assessment score projection.
//! - `programs` — Program-level score rollups.
//! - `courses` — Per-course assessment summaries with outcome coverage.
//! - `outcomes` — Catalog-outcome aggregation.
//!
//! Every handler is a thin projection over [`crate::services`] — scoring
//! and aggregation logic never lives here.

pub mod assessments;
pub mod courses;
pub mod dashboard;
pub mod outcomes;
pub mod programs;
