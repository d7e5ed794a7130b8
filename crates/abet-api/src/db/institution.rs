//! Institutional record persistence: departments, programs, courses,
//! faculty, enrollments, syllabi, and training records.
//!
//! All functions take a `&PgPool`; load functions fill the in-memory
//! store at startup.

use sqlx::PgPool;
use uuid::Uuid;

use abet_core::{
    AcademicYear, Course, CourseSyllabus, Department, Enrollment, Faculty, FacultyTraining,
    Program,
};

use crate::state::Records;

/// Load every institutional collection.
pub async fn load_all(pool: &PgPool, records: &Records) -> Result<(), sqlx::Error> {
    let departments = sqlx::query_as::<_, DepartmentRow>(
        "SELECT id, name, email FROM departments ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records.departments.write().extend(
        departments
            .into_iter()
            .map(|r| (r.id, Department { id: r.id, name: r.name, email: r.email })),
    );

    let programs = sqlx::query_as::<_, ProgramRow>(
        "SELECT id, name, description, department_id FROM programs ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records.programs.write().extend(programs.into_iter().map(|r| {
        (
            r.id,
            Program {
                id: r.id,
                name: r.name,
                description: r.description,
                department_id: r.department_id,
            },
        )
    }));

    let courses = sqlx::query_as::<_, CourseRow>(
        "SELECT id, name, description, credits, program_id, instructor
         FROM courses ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .courses
        .write()
        .extend(courses.into_iter().filter_map(|r| r.into_record().map(|c| (c.id, c))));

    let faculty = sqlx::query_as::<_, FacultyRow>(
        "SELECT id, name, email, department_id FROM faculty ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records.faculty.write().extend(faculty.into_iter().map(|r| {
        (
            r.id,
            Faculty {
                id: r.id,
                name: r.name,
                email: r.email,
                department_id: r.department_id,
            },
        )
    }));

    let enrollments = sqlx::query_as::<_, EnrollmentRow>(
        "SELECT course_id, student_id FROM enrollments ORDER BY course_id, student_id",
    )
    .fetch_all(pool)
    .await?;
    records.enrollments.write().extend(
        enrollments
            .into_iter()
            .map(|r| Enrollment { course_id: r.course_id, student_id: r.student_id }),
    );

    let syllabi = sqlx::query_as::<_, SyllabusRow>(
        "SELECT id, course_id, academic_year, is_updated FROM course_syllabi ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .syllabi
        .write()
        .extend(syllabi.into_iter().filter_map(|r| r.into_record().map(|s| (s.id, s))));

    let training = sqlx::query_as::<_, TrainingRow>(
        "SELECT id, faculty_id, academic_year, completed, training_name
         FROM faculty_training ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    records
        .faculty_training
        .write()
        .extend(training.into_iter().filter_map(|r| r.into_record().map(|t| (t.id, t))));

    Ok(())
}

#[derive(sqlx::FromRow)]
struct DepartmentRow {
    id: Uuid,
    name: String,
    email: String,
}

#[derive(sqlx::FromRow)]
struct ProgramRow {
    id: Uuid,
    name: String,
    description: String,
    department_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    name: String,
    description: String,
    credits: i16,
    program_id: Uuid,
    instructor: Option<String>,
}

impl CourseRow {
    fn into_record(self) -> Option<Course> {
        let credits = match u8::try_from(self.credits) {
            Ok(c) => c,
            Err(_) => {
                tracing::warn!(id = %self.id, credits = self.credits, "skipping course row with invalid credits");
                return None;
            }
        };
        Some(Course {
            id: self.id,
            name: self.name,
            description: self.description,
            credits,
            program_id: self.program_id,
            instructor: self.instructor,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FacultyRow {
    id: Uuid,
    name: String,
    email: String,
    department_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    course_id: Uuid,
    student_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct SyllabusRow {
    id: Uuid,
    course_id: Uuid,
    academic_year: String,
    is_updated: bool,
}

impl SyllabusRow {
    fn into_record(self) -> Option<CourseSyllabus> {
        match AcademicYear::new(self.academic_year) {
            Ok(academic_year) => Some(CourseSyllabus {
                id: self.id,
                course_id: self.course_id,
                academic_year,
                is_updated: self.is_updated,
            }),
            Err(err) => {
                tracing::warn!(id = %self.id, error = %err, "skipping syllabus row with invalid academic year");
                None
            }
        }
    }
}

#[derive(sqlx::FromRow)]
struct TrainingRow {
    id: Uuid,
    faculty_id: Uuid,
    academic_year: String,
    completed: bool,
    training_name: String,
}

impl TrainingRow {
    fn into_record(self) -> Option<FacultyTraining> {
        match AcademicYear::new(self.academic_year) {
            Ok(academic_year) => Some(FacultyTraining {
                id: self.id,
                faculty_id: self.faculty_id,
                academic_year,
                completed: self.completed,
                training_name: self.training_name,
            }),
            Err(err) => {
                tracing::warn!(id = %self.id, error = %err, "skipping training row with invalid academic year");
                None
            }
        }
    }
}
