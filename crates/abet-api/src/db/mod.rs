//! # Database Persistence Layer
//!
//! Optional Postgres persistence via SQLx. When `DATABASE_URL` is set, the
//! API writes every record through to Postgres and reloads the store from
//! it at startup. When absent, the API operates in in-memory-only mode
//! (suitable for development and testing).
//!
//! ## What is persisted
//!
//! - Institutional records (departments, programs, courses, faculty,
//!   enrollments, syllabi, training)
//! - The ABET outcome and assessment-method catalogs
//! - Assessments and their three component kinds
//! - Course method records
//! - The audit event log (append-only; written through but not replayed
//!   into memory — the in-memory trail covers the current process only)

pub mod assessments;
pub mod audit;
pub mod catalog;
pub mod institution;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::state::Records;

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Records will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Load every persisted collection into a fresh record store.
///
/// Rows that fail domain validation (out-of-scale rubric scores, negative
/// weights, malformed terms) are skipped with a warning rather than
/// aborting startup.
pub async fn load_all(pool: &PgPool) -> Result<Records, sqlx::Error> {
    let records = Records::default();

    institution::load_all(pool, &records).await?;
    catalog::load_all(pool, &records).await?;
    assessments::load_all(pool, &records).await?;

    tracing::info!(
        assessments = records.assessments.read().len(),
        courses = records.courses.read().len(),
        outcome_scores = records.outcome_scores.read().len(),
        "record store loaded from PostgreSQL"
    );
    Ok(records)
}
