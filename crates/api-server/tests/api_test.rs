//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use meraki_admin_api::{api_router, AppState};
use meraki_admin_core::{AdminRecord, ApiKey, Organization};
use meraki_admin_dashboard::{
    DashboardApi, DashboardConnector, DashboardError, DashboardResult, NewAdmin,
};
use meraki_admin_jobs::{JobRegistry, JobService, RateLimiter};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

const GOOD_KEY: &str = "good-key";

#[derive(Default)]
struct FakeDashboard {
    organizations: Vec<Organization>,
    admins: Mutex<HashMap<String, Vec<AdminRecord>>>,
    reject_auth: bool,
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
        Ok(self
            .admins
            .lock()
            .unwrap()
            .get(org_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_admin(&self, org_id: &str, admin: &NewAdmin) -> DashboardResult<AdminRecord> {
        let record = AdminRecord {
            id: format!("{org_id}-admin"),
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
        if let Some(admins) = self.admins.lock().unwrap().get_mut(org_id) {
            admins.retain(|a| a.id != admin_id);
        }
        Ok(())
    }
}

/// Accepts `GOOD_KEY` only; anything else gets a dashboard that answers 401.
struct FakeConnector {
    dashboard: Arc<FakeDashboard>,
}

impl DashboardConnector for FakeConnector {
    fn connect(&self, api_key: &ApiKey) -> DashboardResult<Arc<dyn DashboardApi>> {
        if api_key.expose() == GOOD_KEY {
            Ok(self.dashboard.clone())
        } else {
            Ok(Arc::new(FakeDashboard {
                reject_auth: true,
                ..Default::default()
            }))
        }
    }
}

fn app() -> (Router, Arc<FakeDashboard>) {
    let dashboard = Arc::new(FakeDashboard {
        organizations: vec![Organization::new("1", "Acme"), Organization::new("2", "Globex")],
        ..Default::default()
    });
    let service = JobService::new(
        Arc::new(FakeConnector {
            dashboard: dashboard.clone(),
        }),
        Arc::new(JobRegistry::new()),
        RateLimiter::disabled(),
    );
    (api_router(AppState::new(Arc::new(service))), dashboard)
}

async fn api(
    router: &Router,
    method: Method,
    uri: &str,
    key: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        req = req.header("X-Cisco-Meraki-API-Key", key);
    }
    let req = match body {
        Some(body) => req
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn poll_until_complete(router: &Router, job_id: &str) -> Value {
    let uri = format!("/api/v1/jobs/{job_id}");
    for _ in 0..500 {
        let (status, body) = api(router, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] == "complete" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not complete");
}

#[tokio::test]
async fn test_list_organizations() {
    let (router, _) = app();
    let (status, body) = api(
        &router,
        Method::POST,
        "/api/v1/organizations",
        Some(GOOD_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "1", "name": "Acme"}, {"id": "2", "name": "Globex"}]));
}

#[tokio::test]
async fn test_bad_or_missing_key_is_unauthorized() {
    let (router, _) = app();
    let (status, body) = api(
        &router,
        Method::POST,
        "/api/v1/organizations",
        Some("wrong"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_failed");

    let (status, _) = api(&router, Method::POST, "/api/v1/organizations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = json!({"action": "mass_add", "email": "a@x.com", "name": "A"});
    let (status, _) = api(&router, Method::POST, "/api/v1/jobs", Some("wrong"), Some(request)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, jobs) = api(&router, Method::GET, "/api/v1/jobs", None, None).await;
    assert_eq!(jobs, json!([]));
}

#[tokio::test]
async fn test_invalid_request_is_rejected() {
    let (router, _) = app();
    let cases = [
        json!({"action": "add", "email": "not-an-email", "name": "A", "scope": "all"}),
        json!({"action": "mass_add", "email": "a@x.com"}),
        json!({"action": "promote", "email": "a@x.com"}),
        json!({"action": "mass_add", "name": "A"}),
        json!({"email": "a@x.com", "scope": "all"}),
    ];
    for request in cases {
        let (status, body) = api(
            &router,
            Method::POST,
            "/api/v1/jobs",
            Some(GOOD_KEY),
            Some(request.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{request}");
        assert_eq!(body["error"], "invalid_request");
    }
}

#[tokio::test]
async fn test_malformed_body_is_rejected_as_json() {
    let (router, _) = app();
    let cases = [
        json!({"action": 7, "email": "a@x.com"}),
        json!(["mass_add"]),
    ];
    for request in cases {
        let (status, body) = api(
            &router,
            Method::POST,
            "/api/v1/jobs",
            Some(GOOD_KEY),
            Some(request.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{request}");
        assert_eq!(body["error"], "invalid_request");
    }
}

#[tokio::test]
async fn test_mass_add_job_runs_to_completion() {
    let (router, dashboard) = app();
    let request = json!({"action": "mass_add", "email": "a@x.com", "name": "A"});
    let (status, body) = api(
        &router,
        Method::POST,
        "/api/v1/jobs",
        Some(GOOD_KEY),
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let job = poll_until_complete(&router, &job_id).await;
    assert_eq!(job["progress"], 100);
    assert_eq!(job["total"], 2);
    assert_eq!(job["completed"], 2);
    assert_eq!(job["logs"][0]["message"], "Add a@x.com in Acme ... Done");
    assert_eq!(job["logs"][1]["message"], "Add a@x.com in Globex ... Done");
    assert_eq!(dashboard.admins.lock().unwrap().len(), 2);

    let (_, jobs) = api(&router, Method::GET, "/api/v1/jobs", None, None).await;
    assert_eq!(jobs[0]["id"], job_id);
    assert_eq!(jobs[0]["action"], "add");
}

#[tokio::test]
async fn test_selected_delete_with_nothing_to_remove() {
    let (router, _) = app();
    let request = json!({
        "action": "delete_selected",
        "email": "a@x.com",
        "orgs": ["2"]
    });
    let (status, body) = api(
        &router,
        Method::POST,
        "/api/v1/jobs",
        Some(GOOD_KEY),
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let job = poll_until_complete(&router, body["job_id"].as_str().unwrap()).await;
    assert_eq!(job["total"], 1);
    assert_eq!(
        job["logs"][0]["message"],
        "Delete a@x.com in Globex ... Skipped: not found"
    );
}

#[tokio::test]
async fn test_unknown_job_returns_empty_object() {
    let (router, _) = app();
    let uri = format!("/api/v1/jobs/{}", meraki_admin_core::JobId::new());
    let (status, body) = api(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = api(&router, Method::GET, "/api/v1/jobs/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_cancel_unknown_or_finished_job_is_not_found() {
    let (router, _) = app();
    let uri = format!("/api/v1/jobs/{}/cancel", meraki_admin_core::JobId::new());
    let (status, _) = api(&router, Method::POST, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Empty selection completes at birth, so there is nothing to cancel.
    let request = json!({"action": "check_selected", "email": "a@x.com", "orgs": []});
    let (_, body) = api(
        &router,
        Method::POST,
        "/api/v1/jobs",
        Some(GOOD_KEY),
        Some(request),
    )
    .await;
    let uri = format!("/api/v1/jobs/{}/cancel", body["job_id"].as_str().unwrap());
    let (status, _) = api(&router, Method::POST, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_probes() {
    let (router, _) = app();
    let (status, body) = api(&router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["jobs_tracked"], 0);

    for path in ["/ready", "/live"] {
        let (status, _) = api(&router, Method::GET, path, None, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
