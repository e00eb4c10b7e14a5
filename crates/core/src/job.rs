//! Batch job record — progress counters plus the ordered outcome log.
//!
//! A job is mutated only by the task running it. Each target is recorded in
//! two steps (`begin_target`, `record_outcome`), so at any observation the
//! log holds either `completed_targets` entries or one extra in-flight entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::types::{Action, LogEntry, OperationOutcome};

/// Opaque job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: JobId,
    pub status: JobStatus,
    pub action: Action,
    #[serde(rename = "total")]
    pub total_targets: usize,
    #[serde(rename = "completed")]
    pub completed_targets: usize,
    #[serde(rename = "progress")]
    pub progress_percent: u8,
    #[serde(rename = "logs")]
    pub log: Vec<LogEntry>,
    pub outcomes: Vec<OperationOutcome>,
    #[serde(default)]
    pub cancelled: bool,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// `floor(100 * completed / total)`, defined as 100 for an empty batch.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total);
    ((completed * 100) / total) as u8
}

impl BatchJob {
    /// A new job with zero progress. An empty target set is complete at birth.
    pub fn new(id: JobId, action: Action, total_targets: usize) -> Self {
        let now = Utc::now();
        let empty = total_targets == 0;
        Self {
            id,
            status: if empty { JobStatus::Complete } else { JobStatus::Running },
            action,
            total_targets,
            completed_targets: 0,
            progress_percent: progress_percent(0, total_targets),
            log: Vec::new(),
            outcomes: Vec::new(),
            cancelled: false,
            created_at: now,
            finished_at: empty.then_some(now),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Complete
    }

    /// Append the in-flight line for the next target.
    pub fn begin_target(&mut self, message: String) {
        self.log.push(LogEntry::info(message));
    }

    /// Amend the in-flight line with the outcome and advance the counters.
    /// Marks the job complete once every target has been recorded.
    pub fn record_outcome(&mut self, outcome: OperationOutcome) {
        if self.is_complete() {
            return;
        }
        // An outcome without a preceding begin_target still gets its own line.
        if self.log.len() == self.completed_targets {
            self.log.push(LogEntry::info(String::new()));
        }
        if let Some(entry) = self.log.last_mut() {
            entry.message.push_str(&outcome.log_suffix());
            entry.category = outcome.log_category();
        }
        self.outcomes.push(outcome);
        self.completed_targets += 1;
        self.progress_percent = progress_percent(self.completed_targets, self.total_targets);

        if self.completed_targets == self.total_targets {
            self.status = JobStatus::Complete;
            self.finished_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogCategory, Organization};

    fn check_action() -> Action {
        Action::Check {
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_progress_floor() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[test]
    fn test_empty_job_is_complete_immediately() {
        let job = BatchJob::new(JobId::new(), check_action(), 0);
        assert!(job.is_complete());
        assert_eq!(job.progress_percent, 100);
        assert!(job.log.is_empty());
        assert!(job.finished_at.is_some());
    }

    #[test]
    fn test_record_outcome_amends_inflight_entry() {
        let org = Organization::new("1", "Acme");
        let mut job = BatchJob::new(JobId::new(), check_action(), 2);

        job.begin_target("Check a@x.com in Acme ... ".to_string());
        assert_eq!(job.log.len(), job.completed_targets + 1);

        job.record_outcome(OperationOutcome::failed(&org, "boom"));
        assert_eq!(job.log.len(), 1);
        assert_eq!(job.log[0].message, "Check a@x.com in Acme ... Failed: boom");
        assert_eq!(job.log[0].category, LogCategory::Error);
        assert_eq!(job.completed_targets, 1);
        assert_eq!(job.progress_percent, 50);
        assert_eq!(job.status, JobStatus::Running);

        job.begin_target("Check a@x.com in Acme ... ".to_string());
        job.record_outcome(OperationOutcome::skipped(&org, "not found"));
        assert!(job.is_complete());
        assert_eq!(job.progress_percent, 100);
        assert_eq!(job.outcomes.len(), 2);

        // Further outcomes are ignored once complete.
        job.record_outcome(OperationOutcome::done(&org, "Done"));
        assert_eq!(job.completed_targets, 2);
    }

    #[test]
    fn test_job_id_round_trips_through_display() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-job".parse::<JobId>().is_err());
    }
}
