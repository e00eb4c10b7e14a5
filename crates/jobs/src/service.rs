//! Job control boundary. Starts, observes and cancels batch runs.

use meraki_admin_core::{
    AdminToolResult, ApiKey, BatchJob, BatchRequest, JobId, Organization, TargetScope,
};
use meraki_admin_dashboard::DashboardConnector;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::orchestrator::BatchOrchestrator;
use crate::rate_limit::RateLimiter;
use crate::registry::JobRegistry;

pub struct JobService {
    connector: Arc<dyn DashboardConnector>,
    registry: Arc<JobRegistry>,
    limiter: RateLimiter,
}

impl JobService {
    pub fn new(
        connector: Arc<dyn DashboardConnector>,
        registry: Arc<JobRegistry>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            connector,
            registry,
            limiter,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Organizations visible to the credential. Auth and network failures
    /// surface to the caller.
    pub async fn list_organizations(&self, api_key: &ApiKey) -> AdminToolResult<Vec<Organization>> {
        let client = self.connector.connect(api_key)?;
        Ok(client.list_organizations().await?)
    }

    /// Resolve targets, register the job and spawn its orchestrator.
    /// Returns as soon as the job exists; progress is read via [`snapshot`].
    ///
    /// [`snapshot`]: JobService::snapshot
    pub async fn start_batch(
        &self,
        api_key: &ApiKey,
        request: BatchRequest,
    ) -> AdminToolResult<JobId> {
        let client = self.connector.connect(api_key)?;
        let organizations = client.list_organizations().await?;
        let targets = resolve_targets(&organizations, &request.scope);

        let handle = self.registry.create(request.action.clone(), targets.len());
        let job_id = handle.id;
        metrics::counter!("jobs.started", "action" => request.action.kind()).increment(1);
        info!(
            job_id = %job_id,
            action = request.action.kind(),
            targets = targets.len(),
            "Job accepted"
        );

        if targets.is_empty() {
            return Ok(job_id);
        }

        let orchestrator = BatchOrchestrator::new(self.registry.clone(), self.limiter);
        let action = request.action;
        let task = {
            let orchestrator = orchestrator.clone();
            let action = action.clone();
            let targets = targets.clone();
            tokio::spawn(async move {
                orchestrator
                    .run(job_id, client, action, targets, handle.cancel)
                    .await
            })
        };

        // Supervisor: a panicking run must not leave the job running forever.
        tokio::spawn(async move {
            if let Err(e) = task.await {
                error!(job_id = %job_id, error = %e, "Batch task aborted");
                orchestrator.fail_remaining(
                    job_id,
                    &action,
                    &targets,
                    &format!("internal error: {e}"),
                );
            }
        });

        Ok(job_id)
    }

    pub fn snapshot(&self, job_id: JobId) -> Option<BatchJob> {
        self.registry.get(job_id)
    }

    pub fn list_jobs(&self) -> Vec<BatchJob> {
        self.registry.list()
    }

    pub fn cancel(&self, job_id: JobId) -> bool {
        self.registry.cancel(job_id)
    }
}

/// Build the ordered target set. `All` keeps remote order; `Selected` keeps
/// caller order, and ids unknown to the credential are kept with the id as
/// their display name.
pub fn resolve_targets(organizations: &[Organization], scope: &TargetScope) -> Vec<Organization> {
    match scope {
        TargetScope::All => organizations.to_vec(),
        TargetScope::Selected(ids) => {
            let names: HashMap<&str, &str> = organizations
                .iter()
                .map(|o| (o.id.as_str(), o.name.as_str()))
                .collect();
            ids.iter()
                .map(|id| {
                    let name = names.get(id.as_str()).copied().unwrap_or(id.as_str());
                    Organization::new(id.clone(), name)
                })
                .collect()
        }
    }
}
