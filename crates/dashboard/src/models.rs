//! Wire shapes of the dashboard REST API (camelCase JSON).

use meraki_admin_core::{AdminRecord, Organization};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ApiOrganization {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl From<ApiOrganization> for Organization {
    fn from(o: ApiOrganization) -> Self {
        Organization {
            id: o.id,
            name: o.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiAdmin {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl From<ApiAdmin> for AdminRecord {
    fn from(a: ApiAdmin) -> Self {
        AdminRecord {
            id: a.id,
            email: a.email,
            name: a.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminBody<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub org_access: &'static str,
}

/// Error body: `{"errors": ["..."]}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Human-readable message from an error response body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}
