use thiserror::Error;

pub type AdminToolResult<T> = Result<T, AdminToolError>;

#[derive(Error, Debug)]
pub enum AdminToolError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Dashboard API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AdminToolError {
    /// Short machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AdminToolError::Auth(_) => "auth_failed",
            AdminToolError::Api(_) => "dashboard_api_error",
            AdminToolError::Network(_) => "network_error",
            AdminToolError::Validation(_) => "invalid_request",
            AdminToolError::Config(_) => "config_error",
            AdminToolError::Serialization(_) => "serialization_error",
            AdminToolError::Internal(_) => "internal_error",
        }
    }
}

impl From<config::ConfigError> for AdminToolError {
    fn from(e: config::ConfigError) -> Self {
        AdminToolError::Config(e.to_string())
    }
}
