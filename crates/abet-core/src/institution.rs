//! # Institutional Records
//!
//! Departments, programs, courses, faculty, enrollments, course syllabi,
//! and faculty training records. These are read by the aggregation layer
//! (counts, per-course rollups) and by the compliance metrics calculator
//! (syllabus currency, training completion).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::term::AcademicYear;

/// An academic department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A degree program offered by a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub department_id: Uuid,
}

/// A course within a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub credits: u8,
    pub program_id: Uuid,
    /// Display name of the assigned instructor, when one is assigned.
    pub instructor: Option<String>,
}

/// A faculty member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department_id: Uuid,
}

/// A student's enrollment in a course. Only the per-course count is
/// consumed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub course_id: Uuid,
    pub student_id: Uuid,
}

/// Syllabus currency tracking for one course in one academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSyllabus {
    pub id: Uuid,
    pub course_id: Uuid,
    pub academic_year: AcademicYear,
    pub is_updated: bool,
}

/// One faculty member's accreditation-training record for an academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyTraining {
    pub id: Uuid,
    pub faculty_id: Uuid,
    pub academic_year: AcademicYear,
    pub completed: bool,
    pub training_name: String,
}
