//! Traits separating the sampler from the host facilities it reads.

use crate::error::Result;
use crate::metrics::data::{CpuTimes, FsCapacity, SystemSnapshot};
use async_trait::async_trait;
use std::path::Path;

/// Source of per-unit cumulative processor time counters.
///
/// Implementations enumerate every logical processing unit currently visible
/// and must return an error only when no processor information can be
/// obtained at all.
pub trait ProcessorTimeSource: Send + Sync {
    /// Read the current counters for every logical unit.
    fn read_times(&self) -> Result<Vec<CpuTimes>>;
}

/// Source of filesystem capacity counters.
pub trait FilesystemCapacitySource: Send + Sync {
    /// Query capacity for the filesystem mounted at `mount_point`.
    fn capacity(&self, mount_point: &Path) -> Result<FsCapacity>;
}

/// Anything able to produce a [`SystemSnapshot`] on demand.
///
/// The web handlers hold an `Arc<dyn MetricsProvider>` so the router can be
/// exercised without touching real host counters.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Take one fully populated snapshot.
    async fn sample(&self) -> Result<SystemSnapshot>;

    /// Verify the provider can produce snapshots on this host. Called once
    /// before the server starts accepting requests.
    async fn check(&self) -> Result<()> {
        Ok(())
    }
}
