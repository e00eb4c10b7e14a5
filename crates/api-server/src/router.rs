//! Mounts the job API under /api/v1 plus the operational probes.

use crate::handlers;
use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;

/// Build the application router without middleware.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/organizations", post(handlers::list_organizations))
        .route(
            "/api/v1/jobs",
            get(handlers::list_jobs).post(handlers::start_job),
        )
        .route("/api/v1/jobs/:id", get(handlers::get_job))
        .route("/api/v1/jobs/:id/cancel", post(handlers::cancel_job))
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .with_state(state)
}
