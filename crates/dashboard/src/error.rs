use meraki_admin_core::AdminToolError;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("invalid API key or insufficient privileges (HTTP {status})")]
    Auth { status: u16 },

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by dashboard API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("transport error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

impl From<DashboardError> for AdminToolError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Auth { .. } => AdminToolError::Auth(e.to_string()),
            DashboardError::Network(_) => AdminToolError::Network(e.to_string()),
            DashboardError::Config(_) => AdminToolError::Config(e.to_string()),
            DashboardError::Api { .. }
            | DashboardError::RateLimited { .. }
            | DashboardError::Decode(_) => AdminToolError::Api(e.to_string()),
        }
    }
}
