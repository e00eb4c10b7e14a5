//! Single-organization check-then-act operation.
//!
//! Every remote failure is reified into an [`OperationOutcome`]; `reconcile`
//! never returns an error. Add and Delete converge: re-running after a
//! partial failure only touches organizations that still need the change.

use meraki_admin_core::{Action, AdminRecord, Organization, OperationOutcome};
use meraki_admin_dashboard::{DashboardApi, DashboardResult, NewAdmin};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DETAIL_DONE: &str = "Done";
pub const DETAIL_ALREADY_EXISTS: &str = "already exists";
pub const DETAIL_NOT_FOUND: &str = "not found";
pub const DETAIL_CANCELLED: &str = "cancelled";

pub struct AdminReconciler {
    client: Arc<dyn DashboardApi>,
}

impl AdminReconciler {
    pub fn new(client: Arc<dyn DashboardApi>) -> Self {
        Self { client }
    }

    pub async fn reconcile(&self, org: &Organization, action: &Action) -> OperationOutcome {
        match self.try_reconcile(org, action).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    org_id = %org.id,
                    action = action.kind(),
                    error = %e,
                    "Reconcile failed"
                );
                OperationOutcome::failed(org, e.to_string())
            }
        }
    }

    async fn try_reconcile(
        &self,
        org: &Organization,
        action: &Action,
    ) -> DashboardResult<OperationOutcome> {
        let admins = self.client.list_admins(&org.id).await?;
        let existing = find_admin(&admins, action.email());

        let outcome = match (action, existing) {
            (Action::Add { .. }, Some(_)) => OperationOutcome::skipped(org, DETAIL_ALREADY_EXISTS),
            (Action::Add { email, name }, None) => {
                let created = self
                    .client
                    .create_admin(
                        &org.id,
                        &NewAdmin {
                            email: email.clone(),
                            name: name.clone(),
                        },
                    )
                    .await?;
                debug!(org_id = %org.id, admin_id = %created.id, "Admin created");
                OperationOutcome::done(org, DETAIL_DONE)
            }
            (Action::Delete { .. }, None) => OperationOutcome::skipped(org, DETAIL_NOT_FOUND),
            (Action::Delete { .. }, Some(admin)) => {
                self.client.delete_admin(&org.id, &admin.id).await?;
                debug!(org_id = %org.id, admin_id = %admin.id, "Admin deleted");
                OperationOutcome::done(org, DETAIL_DONE)
            }
            (Action::Check { .. }, Some(admin)) => {
                OperationOutcome::done(org, format!("Found (admin id {})", admin.id))
            }
            (Action::Check { .. }, None) => OperationOutcome::skipped(org, DETAIL_NOT_FOUND),
        };
        Ok(outcome)
    }
}

/// First case-insensitive email match; duplicates on the remote side are
/// tolerated.
pub fn find_admin<'a>(admins: &'a [AdminRecord], email: &str) -> Option<&'a AdminRecord> {
    admins.iter().find(|a| a.matches_email(email))
}
