//! In-memory job registry backed by DashMap.
//!
//! Owned explicitly and shared by `Arc`; there is no global instance.
//! Each job is mutated under its entry lock, so `get` always returns a
//! whole snapshot, never a half-applied update.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use meraki_admin_core::{Action, BatchJob, JobId, JobStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A freshly created job and the token that cancels it.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: JobId,
    pub cancel: CancellationToken,
}

#[derive(Default)]
pub struct JobRegistry {
    jobs: DashMap<JobId, BatchJob>,
    cancellations: DashMap<JobId, CancellationToken>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job with zero progress under a fresh id.
    pub fn create(&self, action: Action, total_targets: usize) -> JobHandle {
        let id = JobId::new();
        let cancel = CancellationToken::new();
        let job = BatchJob::new(id, action, total_targets);
        if !job.is_complete() {
            self.cancellations.insert(id, cancel.clone());
        }
        self.jobs.insert(id, job);
        debug!(job_id = %id, total_targets, "Job registered");
        JobHandle { id, cancel }
    }

    pub fn get(&self, id: JobId) -> Option<BatchJob> {
        self.jobs.get(&id).map(|r| r.value().clone())
    }

    /// All jobs, newest first.
    pub fn list(&self) -> Vec<BatchJob> {
        let mut jobs: Vec<BatchJob> = self.jobs.iter().map(|r| r.value().clone()).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    /// Apply one mutation under the entry lock. Returns false for unknown ids.
    pub fn update<F>(&self, id: JobId, f: F) -> bool
    where
        F: FnOnce(&mut BatchJob),
    {
        match self.jobs.get_mut(&id) {
            Some(mut entry) => {
                f(entry.value_mut());
                true
            }
            None => false,
        }
    }

    /// Request cancellation of a running job. Returns false when the job is
    /// unknown or already complete.
    pub fn cancel(&self, id: JobId) -> bool {
        let Some(mut entry) = self.jobs.get_mut(&id) else {
            return false;
        };
        let job = entry.value_mut();
        if job.status != JobStatus::Running {
            return false;
        }
        job.cancelled = true;
        drop(entry);

        if let Some(token) = self.cancellations.get(&id) {
            token.cancel();
        }
        info!(job_id = %id, "Job cancellation requested");
        true
    }

    /// Drop the cancellation token of a finished job.
    pub fn release(&self, id: JobId) {
        self.cancellations.remove(&id);
    }

    /// Remove complete jobs that finished before `cutoff`. Running jobs are
    /// never evicted.
    pub fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|_, job| match (job.status, job.finished_at) {
            (JobStatus::Complete, Some(finished)) => finished >= cutoff,
            _ => true,
        });
        let evicted = before.saturating_sub(self.jobs.len());
        self.cancellations.retain(|id, _| self.jobs.contains_key(id));
        if evicted > 0 {
            info!(evicted, remaining = self.jobs.len(), "Evicted finished jobs");
        }
        evicted
    }

    /// Evict complete jobs that finished more than `max_age` ago. A window
    /// reaching past the clock range evicts nothing.
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        match Utc::now().checked_sub_signed(max_age) {
            Some(cutoff) => self.evict_finished_before(cutoff),
            None => {
                debug!("Retention window exceeds the clock range, nothing to evict");
                0
            }
        }
    }

        pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
