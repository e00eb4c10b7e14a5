//! In-memory dashboard double with call counting and failure injection.

#![allow(dead_code)]

use async_trait::async_trait;
use meraki_admin_core::{AdminRecord, ApiKey, BatchJob, JobId, Organization};
use meraki_admin_dashboard::{
    DashboardApi, DashboardConnector, DashboardError, DashboardResult, NewAdmin,
};
use meraki_admin_jobs::JobRegistry;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListAdmins,
    Create,
    Delete,
}

type Hook = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct FakeDashboard {
    organizations: Vec<Organization>,
    admins: Mutex<HashMap<String, Vec<AdminRecord>>>,
    failures: Mutex<HashSet<(String, Op)>>,
    reject_auth: bool,
    next_id: AtomicUsize,
    pub list_admin_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    on_list_admins: Option<Hook>,
}

impl FakeDashboard {
    pub fn new(organizations: Vec<Organization>) -> Self {
        Self {
            organizations,
            next_id: AtomicUsize::new(1000),
            ..Default::default()
        }
    }

    pub fn rejecting_auth() -> Self {
        Self {
            reject_auth: true,
            ..Default::default()
        }
    }

    pub fn with_admin(self, org_id: &str, id: &str, email: &str) -> Self {
        self.admins
            .lock()
            .unwrap()
            .entry(org_id.to_string())
            .or_default()
            .push(AdminRecord {
                id: id.to_string(),
                email: email.to_string(),
                name: String::new(),
            });
        self
    }

    pub fn failing(self, org_id: &str, op: Op) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert((org_id.to_string(), op));
        self
    }

    /// Called with the org id at the start of every `list_admins`.
    pub fn on_list_admins(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_list_admins = Some(Box::new(hook));
        self
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn admins_in(&self, org_id: &str) -> Vec<AdminRecord> {
        self.admins
            .lock()
            .unwrap()
            .get(org_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn mutating_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst) + self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self, org_id: &str, op: Op) -> DashboardResult<()> {
        if self
            .failures
            .lock()
            .unwrap()
            .contains(&(org_id.to_string(), op))
        {
            return Err(DashboardError::Api {
                status: 500,
                message: format!("injected {op:?} failure"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for FakeDashboard {
    async fn list_organizations(&self) -> DashboardResult<Vec<Organization>> {
        if self.reject_auth {
            return Err(DashboardError::Auth { status: 401 });
        }
        Ok(self.organizations.clone())
    }

    async fn list_admins(&self, org_id: &str) -> DashboardResult<Vec<AdminRecord>> {
        self.list_admin_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.on_list_admins {
            hook(org_id);
        }
        self.check_failure(org_id, Op::ListAdmins)?;
        Ok(self.admins_in(org_id))
    }

    async fn create_admin(&self, org_id: &str, admin: &NewAdmin) -> DashboardResult<AdminRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(org_id, Op::Create)?;
        let record = AdminRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            email: admin.email.clone(),
            name: admin.name.clone(),
        };
        self.admins
            .lock()
            .unwrap()
            .entry(org_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn delete_admin(&self, org_id: &str, admin_id: &str) -> DashboardResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(org_id, Op::Delete)?;
        if let Some(admins) = self.admins.lock().unwrap().get_mut(org_id) {
            admins.retain(|a| a.id != admin_id);
        }
        Ok(())
    }
}

/// Hands out the same fake for every credential.
pub struct FakeConnector(pub Arc<FakeDashboard>);

impl DashboardConnector for FakeConnector {
    fn connect(&self, _api_key: &ApiKey) -> DashboardResult<Arc<dyn DashboardApi>> {
        Ok(self.0.clone())
    }
}

pub fn api_key() -> ApiKey {
    ApiKey::parse("test-key").unwrap()
}

pub fn acme_and_globex() -> Vec<Organization> {
    vec![Organization::new("1", "Acme"), Organization::new("2", "Globex")]
}

/// Poll until the job is complete or the timeout elapses.
pub async fn wait_for_completion(registry: &JobRegistry, id: JobId) -> BatchJob {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = registry.get(id).expect("job should be registered");
        if job.is_complete() {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {id} did not complete in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
