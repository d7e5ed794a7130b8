//! # abet CLI Entry Point
//!
//! Operational commands for the accreditation stack:
//!
//! - `abet serve` — run the API server (equivalent to the `abet-api`
//!   binary; kept here so one installed tool covers operations).
//! - `abet seed` — idempotently populate the ABET outcome catalog
//!   (SO1–SO7) and the standard assessment-method catalog in Postgres.
//!
//! CLI construction is separated from business logic — handlers delegate
//! to `abet-api`'s db layer and never reimplement it.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use abet_api::config::AppConfig;
use abet_api::middleware::metrics::ApiMetrics;
use abet_api::{db, AppState};
use abet_core::{AbetOutcome, AssessmentMethod};

/// ABET accreditation stack CLI.
#[derive(Parser, Debug)]
#[command(name = "abet", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the API server.
    Serve,
    /// Seed the ABET outcome and assessment-method catalogs.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve => serve().await,
        Commands::Seed => seed().await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let state = match db::init_pool().await? {
        Some(pool) => {
            let records = db::load_all(&pool).await?;
            AppState {
                records: Arc::new(records),
                config: Arc::new(config),
                db: Some(pool),
                metrics: ApiMetrics::new(),
            }
        }
        None => AppState::with_config(config),
    };
    abet_api::serve(state).await?;
    Ok(())
}

async fn seed() -> anyhow::Result<()> {
    let pool = db::init_pool()
        .await?
        .context("seed requires DATABASE_URL to be set")?;

    let outcomes = AbetOutcome::standard_catalog();
    let inserted = db::catalog::seed_abet_outcomes(&pool, &outcomes).await?;
    tracing::info!(inserted, total = outcomes.len(), "ABET outcome catalog seeded");

    let methods = AssessmentMethod::standard_methods();
    let inserted = db::catalog::seed_methods(&pool, &methods).await?;
    tracing::info!(inserted, total = methods.len(), "assessment method catalog seeded");

    Ok(())
}
