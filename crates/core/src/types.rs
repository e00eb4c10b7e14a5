use serde::{Deserialize, Serialize};

/// A top-level management scope in the remote dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

impl Organization {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An admin account as reported by the remote API. Not owned by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl AdminRecord {
    /// Case-insensitive email comparison, the only identity used for matching.
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.trim().to_lowercase() == email.trim().to_lowercase()
    }
}

/// The fixed set of batch actions. Carries no organization; targets are
/// supplied per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Add { email: String, name: String },
    Delete { email: String },
    Check { email: String },
}

impl Action {
    pub fn email(&self) -> &str {
        match self {
            Action::Add { email, .. } | Action::Delete { email } | Action::Check { email } => email,
        }
    }

    /// Capitalised verb used at the start of log lines.
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Add { .. } => "Add",
            Action::Delete { .. } => "Delete",
            Action::Check { .. } => "Check",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Add { .. } => "add",
            Action::Delete { .. } => "delete",
            Action::Check { .. } => "check",
        }
    }

    /// In-flight log line for one target, amended once the outcome is known.
    pub fn attempt_message(&self, organization_name: &str) -> String {
        format!("{} {} in {} ... ", self.verb(), self.email(), organization_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Skipped,
    Done,
    Failed,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Skipped => "skipped",
            OperationStatus::Done => "done",
            OperationStatus::Failed => "failed",
        }
    }
}

/// Result of one (action, organization) reconciliation. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub organization_id: String,
    pub organization_name: String,
    pub status: OperationStatus,
    pub detail: String,
}

impl OperationOutcome {
    pub fn done(org: &Organization, detail: impl Into<String>) -> Self {
        Self::with_status(org, OperationStatus::Done, detail)
    }

    pub fn skipped(org: &Organization, detail: impl Into<String>) -> Self {
        Self::with_status(org, OperationStatus::Skipped, detail)
    }

    pub fn failed(org: &Organization, detail: impl Into<String>) -> Self {
        Self::with_status(org, OperationStatus::Failed, detail)
    }

    fn with_status(org: &Organization, status: OperationStatus, detail: impl Into<String>) -> Self {
        Self {
            organization_id: org.id.clone(),
            organization_name: org.name.clone(),
            status,
            detail: detail.into(),
        }
    }

    /// Text appended to the in-flight log line.
    pub fn log_suffix(&self) -> String {
        match self.status {
            OperationStatus::Done => self.detail.clone(),
            OperationStatus::Skipped => format!("Skipped: {}", self.detail),
            OperationStatus::Failed => format!("Failed: {}", self.detail),
        }
    }

    pub fn log_category(&self) -> LogCategory {
        match self.status {
            OperationStatus::Done | OperationStatus::Skipped => LogCategory::Info,
            OperationStatus::Failed => LogCategory::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Info,
    Debug,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub category: LogCategory,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: LogCategory::Info,
        }
    }
}
