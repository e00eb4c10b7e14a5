use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::error::{AdminToolError, AdminToolResult};

/// Dashboard API key. Redacted from `Debug`; read-only once a job starts.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wrap a raw key, rejecting blank input.
    pub fn parse(raw: impl Into<String>) -> AdminToolResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AdminToolError::Validation(
                "API key must not be empty".to_string(),
            ));
        }
        Ok(Self(SecretString::from(trimmed.to_string())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}
