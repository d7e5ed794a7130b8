//! # abet-api Entry Point
//!
//! Initializes tracing, loads configuration, connects to Postgres when
//! configured, and serves the API.

use std::sync::Arc;

use abet_api::config::AppConfig;
use abet_api::middleware::metrics::ApiMetrics;
use abet_api::{db, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

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
