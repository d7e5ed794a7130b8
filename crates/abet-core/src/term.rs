//! # Academic Terms
//!
//! Validated academic-year and semester values. Compliance metrics are
//! always scoped to a configured year and semester, so malformed term
//! strings are rejected at construction instead of silently matching
//! nothing.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// -- Validating Deserialize ---------------------------------------------------

impl<'de> Deserialize<'de> for AcademicYear {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Semester {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// An academic year span written as "YYYY-YYYY", e.g. "2024-2025".
///
/// The second year must be the first plus one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AcademicYear(String);

impl AcademicYear {
    /// Parse and validate a "YYYY-YYYY" span.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAcademicYear`] when the format is
    /// wrong or the span is not consecutive.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let invalid = |v: &str| ValidationError::InvalidAcademicYear(v.to_string());

        let (first, second) = value.split_once('-').ok_or_else(|| invalid(&value))?;
        let first: u32 = first.parse().map_err(|_| invalid(&value))?;
        let second: u32 = second.parse().map_err(|_| invalid(&value))?;
        if first.checked_add(1) != Some(second) {
            return Err(invalid(&value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A semester name, e.g. "Fall 2024". Free-form but never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Semester(String);

impl Semester {
    /// Create a semester value, rejecting blank strings.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySemester);
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
