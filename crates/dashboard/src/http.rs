//! reqwest implementation of [`DashboardApi`].

use async_trait::async_trait;
use meraki_admin_core::config::DashboardConfig;
use meraki_admin_core::{AdminRecord, ApiKey, Organization};
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::{DashboardApi, DashboardConnector, NewAdmin};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{error_message, ApiAdmin, ApiOrganization, CreateAdminBody};

/// Access level granted to admins created by this tool.
const ORG_ACCESS_FULL: &str = "full";

/// Fallback wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Upper bound on a single `Retry-After` wait.
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Shares one connection pool across all credentials.
#[derive(Clone)]
pub struct HttpConnector {
    http: reqwest::Client,
    base_url: Url,
    max_retries: u32,
}

impl HttpConnector {
    pub fn new(config: &DashboardConfig) -> DashboardResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| DashboardError::Config(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }
        Ok(Self {
            http,
            base_url,
            max_retries: config.max_retries,
        })
    }
}

impl DashboardConnector for HttpConnector {
    fn connect(&self, api_key: &ApiKey) -> DashboardResult<Arc<dyn DashboardApi>> {
        Ok(Arc::new(HttpDashboardClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: api_key.clone(),
            max_retries: self.max_retries,
        }))
    }
}

pub struct HttpDashboardClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: ApiKey,
    max_retries: u32,
}

impl HttpDashboardClient {
    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay inside their own segment.
    fn url(&self, segments: &[&str]) -> DashboardResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::Config("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send with auth headers, retrying 429s up to `max_retries` times.
    /// Non-2xx statuses are mapped to [`DashboardError`].
    async fn send<F>(&self, build: F) -> DashboardResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let resp = build()
                .bearer_auth(self.api_key.expose())
                .header(ACCEPT, "application/json")
                .send()
                .await?;
            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = retry_after(&resp);
                if attempt < self.max_retries {
                    attempt += 1;
                    warn!(
                        url = %resp.url(),
                        attempt,
                        retry_after_secs,
                        "Dashboard API rate limit hit, backing off"
                    );
                    tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
                    continue;
                }
                return Err(DashboardError::RateLimited { retry_after_secs });
            }

            if status == StatusCode::UNAUTHORIZED {
                return Err(DashboardError::Auth {
                    status: status.as_u16(),
                });
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(DashboardError::Api {
                    status: status.as_u16(),
                    message: error_message(&body),
                });
            }

            return Ok(resp);
        }
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> DashboardResult<T> {
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| DashboardError::Decode(e.to_string()))
    }
}

fn retry_after(resp: &Response) -> u64 {
    resp.headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
        .min(MAX_RETRY_AFTER_SECS)
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn list_organizations(&self) -> DashboardResult<Vec<Organization>> {
        let url = self.url(&["organizations"])?;
        let resp = self.send(|| self.http.get(url.clone())).await?;
        let orgs: Vec<ApiOrganization> = Self::parse(resp).await?;
        debug!(count = orgs.len(), "Listed organizations");
        Ok(orgs.into_iter().map(Organization::from).collect())
    }

    async fn list_admins(&self, org_id: &str) -> DashboardResult<Vec<AdminRecord>> {
        let url = self.url(&["organizations", org_id, "admins"])?;
        let resp = self.send(|| self.http.get(url.clone())).await?;
        let admins: Vec<ApiAdmin> = Self::parse(resp).await?;
        Ok(admins.into_iter().map(AdminRecord::from).collect())
    }

    async fn create_admin(&self, org_id: &str, admin: &NewAdmin) -> DashboardResult<AdminRecord> {
        let url = self.url(&["organizations", org_id, "admins"])?;
        let body = CreateAdminBody {
            email: &admin.email,
            name: &admin.name,
            org_access: ORG_ACCESS_FULL,
        };
        let resp = self.send(|| self.http.post(url.clone()).json(&body)).await?;
        let created: ApiAdmin = Self::parse(resp).await?;
        Ok(created.into())
    }

    async fn delete_admin(&self, org_id: &str, admin_id: &str) -> DashboardResult<()> {
        let url = self.url(&["organizations", org_id, "admins", admin_id])?;
        self.send(|| self.http.delete(url.clone())).await?;
        Ok(())
    }
}
