//! # Application Configuration
//!
//! Environment-driven configuration. `DATABASE_URL` is optional — when it
//! is absent the API runs in-memory only, which is the mode used by tests
//! and local development.

use abet_core::{AcademicYear, Semester};

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind, e.g. "0.0.0.0:8080".
    pub bind_addr: String,
    /// Static bearer token; `None` disables token checking.
    pub auth_token: Option<String>,
    /// Academic year that scoped metrics (syllabi, training) evaluate.
    pub academic_year: AcademicYear,
    /// Semester that method-compliance records are gathered for.
    pub semester: Semester,
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Malformed `ABET_ACADEMIC_YEAR`/`ABET_SEMESTER` values are rejected
    /// loudly instead of silently matching no records.
    pub fn from_env() -> Result<Self, abet_core::ValidationError> {
        let academic_year = match std::env::var("ABET_ACADEMIC_YEAR") {
            Ok(raw) => AcademicYear::new(raw)?,
            Err(_) => AcademicYear::new("2024-2025").expect("default year is valid"),
        };
        let semester = match std::env::var("ABET_SEMESTER") {
            Ok(raw) => Semester::new(raw)?,
            Err(_) => Semester::new("Fall 2024").expect("default semester is valid"),
        };
        Ok(Self {
            bind_addr: std::env::var("ABET_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            auth_token: std::env::var("ABET_AUTH_TOKEN").ok(),
            academic_year,
            semester,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            auth_token: None,
            academic_year: AcademicYear::new("2024-2025").expect("default year is valid"),
            semester: Semester::new("Fall 2024").expect("default semester is valid"),
        }
    }
}
