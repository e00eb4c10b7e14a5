//! Batch requests — loosely shaped wire input validated once into typed values.

use serde::{Deserialize, Serialize};

use crate::error::{AdminToolError, AdminToolResult};
use crate::types::Action;

/// Maximum email length accepted at the boundary.
const MAX_EMAIL_LEN: usize = 254;

/// Maximum admin display name length.
const MAX_NAME_LEN: usize = 255;

/// Which organizations a batch applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "orgs", rename_all = "snake_case")]
pub enum TargetScope {
    /// Every organization visible to the credential.
    All,
    /// Explicitly chosen organization ids, in caller order.
    Selected(Vec<String>),
}

/// A well-formed batch request. Only constructed through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub action: Action,
    pub scope: TargetScope,
}

/// Raw request body as submitted by a client.
///
/// `action` accepts `add`, `delete`, `check` and the form vocabulary
/// `add_selected`, `mass_add`, `delete_selected`, `mass_delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartJobRequest {
    /// Missing fields deserialize empty so `validate` reports them.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `all` or `selected`. Implied by `mass_*` actions.
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub orgs: Vec<String>,
}

impl StartJobRequest {
    pub fn validate(self) -> AdminToolResult<BatchRequest> {
        let (kind, mass) = parse_action(&self.action)?;

        let email = self.email.trim().to_string();
        validate_email(&email)?;

        let action = match kind {
            "add" => {
                let name = self.name.as_deref().map(str::trim).unwrap_or_default();
                if name.is_empty() {
                    return Err(invalid("'name' is required to add an admin"));
                }
                if name.len() > MAX_NAME_LEN {
                    return Err(invalid("'name' exceeds maximum length"));
                }
                Action::Add {
                    email,
                    name: name.to_string(),
                }
            }
            "delete" => Action::Delete { email },
            _ => Action::Check { email },
        };

        let scope = match (self.scope.as_deref().map(str::trim), mass) {
            (_, true) | (Some("all"), false) => TargetScope::All,
            (None, false) | (Some("selected"), false) => {
                TargetScope::Selected(dedup_ids(self.orgs)?)
            }
            (Some(other), false) => {
                return Err(invalid(&format!("unknown scope '{other}'")));
            }
        };

        Ok(BatchRequest { action, scope })
    }
}

fn parse_action(raw: &str) -> AdminToolResult<(&'static str, bool)> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "add" | "add_selected" => Ok(("add", false)),
        "mass_add" => Ok(("add", true)),
        "delete" | "delete_selected" => Ok(("delete", false)),
        "mass_delete" => Ok(("delete", true)),
        "check" | "check_selected" => Ok(("check", false)),
        "mass_check" => Ok(("check", true)),
        "" => Err(invalid("'action' is required")),
        other => Err(invalid(&format!("unknown action '{other}'"))),
    }
}

/// Keep first occurrence order, drop blanks and repeats.
fn dedup_ids(ids: Vec<String>) -> AdminToolResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if id.is_empty() {
            return Err(invalid("organization ids must not be blank"));
        }
        if !out.iter().any(|seen| seen == id) {
            out.push(id.to_string());
        }
    }
    Ok(out)
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain,
/// no whitespace.
pub fn validate_email(email: &str) -> AdminToolResult<()> {
    if email.is_empty() {
        return Err(invalid("'email' is required"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(invalid("'email' exceeds maximum length"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("'email' must not contain whitespace"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("'email' must contain '@'"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("'email' is malformed"));
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid("'email' domain is malformed"));
    }
    Ok(())
}

fn invalid(msg: &str) -> AdminToolError {
    AdminToolError::Validation(msg.to_string())
}
