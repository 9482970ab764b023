//! Error handling for the mint monitor.

/// A specialized `Result` type for mint monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// The main error type for sampling and serving host telemetry.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Processor time counters could not be enumerated
    #[error("CPU sampling failed: {0}")]
    Sampling(String),

    /// Filesystem capacity could not be queried
    #[error("Disk query failed: {0}")]
    DiskQuery(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    /// Create a new CPU sampling error
    pub fn sampling_error(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }

    /// Create a new disk query error
    pub fn disk_query_error(msg: impl Into<String>) -> Self {
        Self::DiskQuery(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
