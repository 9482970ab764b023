//! # Mint Monitor - host telemetry for a payment-mint dashboard
//!
//! Measures CPU utilization and disk capacity of the machine running a mint
//! and serves them as JSON for the dashboard's polling client.
//!
//! ## Features
//!
//! - **Delta-based CPU sampling**: per-core busy time over a short window
//! - **Disk capacity**: free/total space for one mount point, human-readable
//! - **Tolerant disk reads**: a failed capacity query degrades to placeholder data
//! - **Library + Binary**: embed the router or run the standalone server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mint_monitor::{start_web_server, ResourceSampler, WebConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sampler = ResourceSampler::new();
//!     start_web_server(WebConfig::default(), Arc::new(sampler)).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod metrics;
pub mod web;

// Re-export public API
pub use error::{MonitorError, Result};
pub use metrics::{
    collector::ResourceSampler,
    data::{CpuReading, CpuTimes, DiskSpaceReading, FsCapacity, SystemSnapshot},
    traits::{FilesystemCapacitySource, MetricsProvider, ProcessorTimeSource},
};
pub use web::{create_app, start_web_server, start_web_server_simple, WebConfig};

/// Delay between the two CPU counter reads, in milliseconds.
pub const DEFAULT_SAMPLE_WINDOW_MS: u64 = 100;

/// Mount point whose capacity is reported by default.
pub const DEFAULT_MOUNT_POINT: &str = "/";

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 8080;
