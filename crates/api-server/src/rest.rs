//! Shared state, error mapping and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use meraki_admin_core::AdminToolError;
use meraki_admin_jobs::JobService;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobService>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(jobs: Arc<JobService>) -> Self {
        Self {
            jobs,
            start_time: Instant::now(),
        }
    }
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Map a domain error onto an HTTP status and JSON body.
pub fn error_response(err: AdminToolError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        AdminToolError::Validation(_) => {
            metrics::counter!("api.validation_errors").increment(1);
            StatusCode::BAD_REQUEST
        }
        AdminToolError::Auth(_) => StatusCode::UNAUTHORIZED,
        AdminToolError::Api(_) | AdminToolError::Network(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(error = %err, code = err.code(), "Request failed");
        metrics::counter!("api.errors").increment(1);
    } else {
        warn!(error = %err, code = err.code(), "Request rejected");
    }

    // Internal details stay in the log.
    let message = match &err {
        AdminToolError::Serialization(_) | AdminToolError::Internal(_) => {
            "Internal processing error".to_string()
        }
        other => other.to_string(),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.code().to_string(),
            message,
        }),
    )
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        jobs_tracked: state.jobs.registry().len(),
    })
}

/// GET /ready — Readiness probe.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live — Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub jobs_tracked: usize,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AdminToolError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AdminToolError::Auth("nope".into()), StatusCode::UNAUTHORIZED),
            (AdminToolError::Api("HTTP 500".into()), StatusCode::BAD_GATEWAY),
            (AdminToolError::Network("reset".into()), StatusCode::BAD_GATEWAY),
            (AdminToolError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, _) = error_response(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let (_, Json(body)) = error_response(AdminToolError::Internal(anyhow::anyhow!(
            "secret stack detail"
        )));
        assert_eq!(body.error, "internal_error");
        assert!(!body.message.contains("secret"));
    }
}
