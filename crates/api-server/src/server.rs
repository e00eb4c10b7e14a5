//! API server — HTTP listener plus the optional Prometheus exporter.

use crate::rest::AppState;
use crate::router::api_router;
use axum::Router;
use meraki_admin_core::AppConfig;
use meraki_admin_jobs::JobService;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    jobs: Arc<JobService>,
}

impl ApiServer {
    pub fn new(config: AppConfig, jobs: Arc<JobService>) -> Self {
        Self { config, jobs }
    }

    /// Full application with middleware applied.
    pub fn app(&self) -> Router {
        api_router(AppState::new(self.jobs.clone()))
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app()).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port, if enabled.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        if !self.config.metrics.enabled {
            return Ok(());
        }

        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
