//! Meraki admin batch runner.
//!
//! Serves the JSON job API on the configured address and runs add/delete/check
//! batches against the Dashboard in the background.

use clap::Parser;
use meraki_admin_api::ApiServer;
use meraki_admin_core::AppConfig;
use meraki_admin_dashboard::HttpConnector;
use meraki_admin_jobs::{JobRegistry, JobService, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Upper bound on how often finished jobs are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(name = "meraki-admin")]
#[command(about = "Add, delete or check an admin across many Meraki organizations")]
#[command(version)]
struct Cli {
    /// Bind address (overrides config)
    #[arg(long, env = "MERAKI_ADMIN__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "MERAKI_ADMIN__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Seconds to wait between organizations in a batch
    #[arg(long, env = "MERAKI_ADMIN__JOBS__CALL_DELAY_SECS")]
    call_delay_secs: Option<f64>,

    /// Dashboard API base URL (overrides config)
    #[arg(long, env = "MERAKI_ADMIN__DASHBOARD__BASE_URL")]
    dashboard_base_url: Option<String>,

    /// Drop finished jobs older than this many seconds; 0 keeps them
    #[arg(long, env = "MERAKI_ADMIN__JOBS__RETENTION_SECS")]
    retention_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meraki_admin=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Meraki admin starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(delay) = cli.call_delay_secs {
        config.jobs.call_delay_secs = delay;
    }
    if let Some(url) = cli.dashboard_base_url {
        config.dashboard.base_url = url;
    }
    if let Some(secs) = cli.retention_secs {
        config.jobs.retention_secs = secs;
    }

    info!(
        host = %config.api.host,
        http_port = config.api.http_port,
        dashboard = %config.dashboard.base_url,
        retention_secs = config.jobs.retention_secs,
        "Configuration loaded"
    );

    let connector = Arc::new(HttpConnector::new(&config.dashboard)?);
    let registry = Arc::new(JobRegistry::new());
    let limiter = RateLimiter::new(config.jobs.call_delay());
    info!(
        call_delay_ms = limiter.interval().as_millis() as u64,
        throttled = limiter.is_enabled(),
        "Rate limiter configured"
    );
    let jobs = Arc::new(JobService::new(connector, registry.clone(), limiter));

    if let Some(retention) = config.jobs.retention() {
        match chrono::Duration::from_std(retention) {
            Ok(max_age) => {
                tokio::spawn(async move {
                    let mut interval = tokio::time::interval(SWEEP_INTERVAL.min(retention));
                    loop {
                        interval.tick().await;
                        registry.evict_older_than(max_age);
                    }
                });
            }
            Err(e) => error!(error = %e, "Retention out of range, finished jobs will be kept"),
        }
    }

    let api_server = ApiServer::new(config.clone(), jobs);

    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Meraki admin is ready to serve traffic");

    api_server.start_http().await?;

    Ok(())
}
