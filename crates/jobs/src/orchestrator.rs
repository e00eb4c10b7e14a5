//! Batch orchestrator: drives one reconcile per target, strictly in order.
//!
//! The orchestrator is the sole writer of its job record. Per target it
//! publishes the in-flight log line, reconciles, then records the outcome
//! in a single registry update. A failed target never stops the loop.

use meraki_admin_core::{Action, JobId, OperationOutcome, OperationStatus, Organization};
use meraki_admin_dashboard::DashboardApi;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::rate_limit::RateLimiter;
use crate::reconciler::{AdminReconciler, DETAIL_CANCELLED};
use crate::registry::JobRegistry;

/// Per-status counts for the completion log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, status: OperationStatus) {
        match status {
            OperationStatus::Done => self.done += 1,
            OperationStatus::Skipped => self.skipped += 1,
            OperationStatus::Failed => self.failed += 1,
        }
    }
}

#[derive(Clone)]
pub struct BatchOrchestrator {
    registry: Arc<JobRegistry>,
    limiter: RateLimiter,
}

impl BatchOrchestrator {
    pub fn new(registry: Arc<JobRegistry>, limiter: RateLimiter) -> Self {
        Self { registry, limiter }
    }

    /// Run the batch to completion. Once cancelled, the remaining targets
    /// are recorded as skipped without remote calls.
    pub async fn run(
        &self,
        job_id: JobId,
        client: Arc<dyn DashboardApi>,
        action: Action,
        targets: Vec<Organization>,
        cancel: CancellationToken,
    ) -> BatchSummary {
        let reconciler = AdminReconciler::new(client);
        let total = targets.len();
        let mut summary = BatchSummary::default();

        info!(
            job_id = %job_id,
            action = action.kind(),
            targets = total,
            "Batch started"
        );

        for (index, org) in targets.iter().enumerate() {
            self.registry
                .update(job_id, |job| job.begin_target(action.attempt_message(&org.name)));

            let outcome = if cancel.is_cancelled() {
                OperationOutcome::skipped(org, DETAIL_CANCELLED)
            } else {
                reconciler.reconcile(org, &action).await
            };

            match outcome.status {
                OperationStatus::Failed => warn!(
                    job_id = %job_id,
                    org_id = %org.id,
                    detail = %outcome.detail,
                    "Target failed"
                ),
                _ => info!(
                    job_id = %job_id,
                    org_id = %org.id,
                    status = outcome.status.as_str(),
                    detail = %outcome.detail,
                    "Target processed"
                ),
            }
            metrics::counter!("reconcile.outcomes", "status" => outcome.status.as_str())
                .increment(1);
            summary.record(outcome.status);

            self.registry.update(job_id, |job| job.record_outcome(outcome));

            let is_last = index + 1 == total;
            if !is_last && !cancel.is_cancelled() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = self.limiter.wait() => {}
                }
            }
        }

        self.registry.release(job_id);
        metrics::counter!("jobs.completed").increment(1);
        info!(
            job_id = %job_id,
            done = summary.done,
            skipped = summary.skipped,
            failed = summary.failed,
            cancelled = cancel.is_cancelled(),
            "Batch complete"
        );
        summary
    }

    /// Settle a job whose task died mid-run: every target not yet recorded
    /// becomes a failed outcome so the job still reaches completion.
    pub fn fail_remaining(
        &self,
        job_id: JobId,
        action: &Action,
        targets: &[Organization],
        reason: &str,
    ) {
        self.registry.update(job_id, |job| {
            let start = job.completed_targets.min(targets.len());
            for org in &targets[start..] {
                // The target that was in flight already has its line.
                if job.log.len() == job.completed_targets {
                    job.begin_target(action.attempt_message(&org.name));
                }
                job.record_outcome(OperationOutcome::failed(org, reason));
            }
        });
        self.registry.release(job_id);
    }
}
