//! # abet-api — Axum API Services for the ABET Accreditation Stack
//!
//! The REST boundary over the record store and scoring engine. Handlers
//! are thin projections of [`services`] calls; the engine never leaks into
//! route code.
//!
//! ## API Surface
//!
//! | Prefix                      | Module                  | Domain                    |
//! |-----------------------------|-------------------------|---------------------------|
//! | `/v1/dashboard/*`           | [`routes::dashboard`]   | Stats, compliance, methods |
//! | `/v1/assessments/*`         | [`routes::assessments`] | Writes + score projection |
//! | `/v1/programs/*`            | [`routes::programs`]    | Program rollups           |
//! | `/v1/courses/summary`       | [`routes::courses`]     | Course summaries          |
//! | `/v1/outcomes`              | [`routes::outcomes`]    | Outcome aggregation       |
//! | `/openapi.json`             | [`openapi`]             | OpenAPI document          |
//! | `/health/*`, `/metrics`     | here                    | Probes (unauthenticated)  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No scoring or aggregation logic in route handlers — delegates to
//!   [`services`], which delegates to `abet-engine`.
//! - All errors map to structured HTTP responses via [`error::AppError`].

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` are mounted outside the auth
/// middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::dashboard::router())
        .merge(routes::assessments::router())
        .merge(routes::programs::router())
        .merge(routes::courses::router())
        .merge(routes::outcomes::router())
        .merge(openapi::router())
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    Router::new()
        .merge(api)
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .route("/metrics", get(serve_metrics))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::metrics::track,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health_live() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Readiness probe. Reports the persistence mode so operators can tell an
/// in-memory instance from a database-backed one.
async fn health_ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "persistence": if state.db.is_some() { "postgres" } else { "memory" },
    }))
}

/// Prometheus exposition endpoint. Domain gauges are refreshed from the
/// record store on every scrape.
async fn serve_metrics(State(state): State<AppState>) -> String {
    state.metrics.refresh_gauges(&state.records);
    state.metrics.render()
}

/// Bind and serve until shutdown.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let bind_addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "abet-api listening");
    axum::serve(listener, app(state)).await
}
