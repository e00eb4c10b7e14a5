pub mod config;
pub mod credential;
pub mod error;
pub mod job;
pub mod request;
pub mod types;

pub use config::AppConfig;
pub use credential::ApiKey;
pub use error::{AdminToolError, AdminToolResult};
pub use job::{BatchJob, JobId, JobStatus};
pub use request::{BatchRequest, StartJobRequest, TargetScope};
pub use types::{
    Action, AdminRecord, LogCategory, LogEntry, OperationOutcome, OperationStatus, Organization,
};
