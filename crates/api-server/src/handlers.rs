//! Axum handlers for organization listing and batch jobs.
//!
//! Every call that reaches the Dashboard needs the caller's API key in the
//! `X-Cisco-Meraki-API-Key` header. Keys are never stored past the request
//! that starts a job.

use crate::models::{CancelJobResponse, JobStatusBody, JobSummary, StartJobResponse};
use crate::rest::{error_response, ApiResult, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use meraki_admin_core::{AdminToolError, ApiKey, JobId, Organization, StartJobRequest};

pub const API_KEY_HEADER: &str = "x-cisco-meraki-api-key";

fn api_key(headers: &HeaderMap) -> Result<ApiKey, AdminToolError> {
    let raw = headers
        .get(API_KEY_HEADER)
        .ok_or_else(|| AdminToolError::Auth(format!("missing {API_KEY_HEADER} header")))?
        .to_str()
        .map_err(|_| AdminToolError::Auth("API key header is not valid text".to_string()))?;
    ApiKey::parse(raw).map_err(|_| AdminToolError::Auth("API key must not be empty".to_string()))
}

/// POST /api/v1/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Organization>>> {
    let key = api_key(&headers).map_err(error_response)?;
    let organizations = state
        .jobs
        .list_organizations(&key)
        .await
        .map_err(error_response)?;
    Ok(Json(organizations))
}

/// POST /api/v1/jobs — validate, register and start a batch.
pub async fn start_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<StartJobRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StartJobResponse>)> {
    let Json(req) = payload
        .map_err(|e| error_response(AdminToolError::Validation(e.body_text())))?;
    let batch = req.validate().map_err(error_response)?;
    let key = api_key(&headers).map_err(error_response)?;

    let job_id = state
        .jobs
        .start_batch(&key, batch)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::ACCEPTED, Json(StartJobResponse { job_id })))
}

pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobSummary>> {
    Json(state.jobs.list_jobs().iter().map(JobSummary::from).collect())
}

/// GET /api/v1/jobs/:id — unknown or malformed ids yield `{}`.
pub async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> Json<JobStatusBody> {
    let job = id
        .parse::<JobId>()
        .ok()
        .and_then(|id| state.jobs.snapshot(id));
    Json(JobStatusBody::from(job))
}

pub async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CancelJobResponse>), StatusCode> {
    let job_id = id.parse::<JobId>().map_err(|_| StatusCode::NOT_FOUND)?;
    if !state.jobs.cancel(job_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    metrics::counter!("jobs.cancelled").increment(1);
    Ok((
        StatusCode::ACCEPTED,
        Json(CancelJobResponse {
            job_id,
            cancelled: true,
        }),
    ))
}
