//! Response bodies of the admin API.

use chrono::{DateTime, Utc};
use meraki_admin_core::{BatchJob, JobId, JobStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StartJobResponse {
    pub job_id: JobId,
}

#[derive(Debug, Serialize)]
pub struct CancelJobResponse {
    pub job_id: JobId,
    pub cancelled: bool,
}

/// Job status poll body. Unknown ids serialise as `{}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JobStatusBody {
    Found(Box<BatchJob>),
    Unknown {},
}

impl From<Option<BatchJob>> for JobStatusBody {
    fn from(job: Option<BatchJob>) -> Self {
        match job {
            Some(job) => JobStatusBody::Found(Box::new(job)),
            None => JobStatusBody::Unknown {},
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub action: &'static str,
    pub email: String,
    pub status: JobStatus,
    pub progress: u8,
    pub total: usize,
    pub completed: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&BatchJob> for JobSummary {
    fn from(job: &BatchJob) -> Self {
        Self {
            id: job.id,
            action: job.action.kind(),
            email: job.action.email().to_string(),
            status: job.status,
            progress: job.progress_percent,
            total: job.total_targets,
            completed: job.completed_targets,
            created_at: job.created_at,
        }
    }
}
