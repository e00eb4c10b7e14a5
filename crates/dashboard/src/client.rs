//! Client seam for the remote dashboard API.
//! Every call is fallible; callers decide whether a failure is fatal.

use async_trait::async_trait;
use meraki_admin_core::{AdminRecord, ApiKey, Organization};
use std::sync::Arc;

use crate::error::DashboardResult;

/// Admin to be created with full organization-level access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    pub email: String,
    pub name: String,
}

/// Operations against the dashboard, bound to one API key.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn list_organizations(&self) -> DashboardResult<Vec<Organization>>;

    async fn list_admins(&self, org_id: &str) -> DashboardResult<Vec<AdminRecord>>;

    async fn create_admin(&self, org_id: &str, admin: &NewAdmin) -> DashboardResult<AdminRecord>;

    async fn delete_admin(&self, org_id: &str, admin_id: &str) -> DashboardResult<()>;
}

/// Builds a [`DashboardApi`] for a given credential.
pub trait DashboardConnector: Send + Sync {
    fn connect(&self, api_key: &ApiKey) -> DashboardResult<Arc<dyn DashboardApi>>;
}
