//! Web server and API endpoints for the mint dashboard.
//!
//! Exposes the resource sampler over HTTP. Every request to
//! `/api/system-info` takes its own snapshot; nothing is cached or pushed.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{MonitorError, Result};
use crate::metrics::{MetricsProvider, ResourceSampler};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Start the web server with the provided configuration and snapshot provider.
pub async fn start_web_server(config: WebConfig, provider: Arc<dyn MetricsProvider>) -> Result<()> {
    config.validate()?;
    provider.check().await?;

    let app = create_app(&config, provider);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| MonitorError::config_error(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MonitorError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    info!("Starting mint monitor on http://{}", addr);
    info!("API endpoint: http://{}{}", addr, router::SYSTEM_INFO_PATH);
    info!("Health endpoint: http://{}{}", addr, router::HEALTH_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MonitorError::web_server_error(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

/// Start a web server with simple port-only configuration.
///
/// Samples the host's own counters for the filesystem root.
pub async fn start_web_server_simple(port: u16) -> Result<()> {
    let config = WebConfig::default().with_port(port);
    let sampler = ResourceSampler::new()
        .with_mount_point(config.mount_point.clone())
        .with_window(config.sample_window());
    start_web_server(config, Arc::new(sampler)).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
