//! Web server configuration.

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the web server and the sampler it drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfig {
    /// Host to bind the server to
    pub host: String,
    /// Port to bind the server to
    pub port: u16,
    /// Whether to enable CORS
    pub enable_cors: bool,
    /// Mount point whose capacity is reported
    pub mount_point: String,
    /// Delay between the two CPU counter reads, in milliseconds
    pub sample_window_ms: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_WEB_PORT,
            enable_cors: true,
            mount_point: crate::DEFAULT_MOUNT_POINT.to_string(),
            sample_window_ms: crate::DEFAULT_SAMPLE_WINDOW_MS,
        }
    }
}

impl WebConfig {
    /// Create a new web configuration with custom host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the host for the web server.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port for the web server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enable_cors: bool) -> Self {
        self.enable_cors = enable_cors;
        self
    }

    /// Set the mount point to report.
    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Self {
        self.mount_point = mount_point.into();
        self
    }

    /// Set the CPU sampling window in milliseconds.
    pub fn with_sample_window(mut self, window_ms: u64) -> Self {
        self.sample_window_ms = window_ms;
        self
    }

    pub fn sample_window(&self) -> Duration {
        Duration::from_millis(self.sample_window_ms)
    }

    /// Get the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(MonitorError::config_error("port must be non-zero"));
        }
        if self.sample_window_ms == 0 {
            return Err(MonitorError::config_error(
                "sample window must be at least 1 ms",
            ));
        }
        if self.mount_point.is_empty() {
            return Err(MonitorError::config_error("mount point must not be empty"));
        }
        Ok(())
    }
}
