//! Resource sampler: delta-based CPU usage plus root filesystem capacity.

use crate::error::{MonitorError, Result};
use crate::metrics::{
    data::*,
    sources::{ProcStatSource, StatvfsDiskSource},
    traits::{FilesystemCapacitySource, MetricsProvider, ProcessorTimeSource},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::{task, time};
use tracing::{debug, warn};

/// Samples CPU utilization and disk capacity on demand.
///
/// Holds no readings between calls: every [`ResourceSampler::sample`] takes
/// its own pair of processor counter reads and a fresh capacity query.
/// Cloning is cheap and clones share the underlying sources.
#[derive(Clone)]
pub struct ResourceSampler {
    processors: Arc<dyn ProcessorTimeSource>,
    filesystem: Arc<dyn FilesystemCapacitySource>,
    mount_point: PathBuf,
    window: Duration,
}

impl ResourceSampler {
    /// Create a sampler reading the host's own counters for the filesystem root.
    pub fn new() -> Self {
        Self::with_sources(Arc::new(ProcStatSource::new()), Arc::new(StatvfsDiskSource))
    }

    /// Create a sampler over arbitrary sources.
    pub fn with_sources(
        processors: Arc<dyn ProcessorTimeSource>,
        filesystem: Arc<dyn FilesystemCapacitySource>,
    ) -> Self {
        Self {
            processors,
            filesystem,
            mount_point: PathBuf::from(crate::DEFAULT_MOUNT_POINT),
            window: Duration::from_millis(crate::DEFAULT_SAMPLE_WINDOW_MS),
        }
    }

    /// Set the mount point whose capacity is reported.
    pub fn with_mount_point(mut self, mount_point: impl Into<PathBuf>) -> Self {
        self.mount_point = mount_point.into();
        self
    }

    /// Set the delay between the two processor counter reads.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Take one snapshot.
    ///
    /// Fails only when processor counters are unavailable. A failed disk
    /// query is replaced by [`DiskSpaceReading::fallback`]. The disk query
    /// runs on the blocking pool alongside the CPU window.
    pub async fn sample(&self) -> Result<SystemSnapshot> {
        let (disk_space, cpu) = tokio::join!(
            self.read_disk(),
            measure_cpu(self.processors.as_ref(), self.window)
        );
        let cpu = cpu?;

        debug!(
            usage = cpu.usage_percent,
            cores = cpu.core_count,
            percent_free = disk_space.free_percent,
            "Sampled system resources"
        );

        Ok(SystemSnapshot { disk_space, cpu })
    }

    /// Confirm processor counters can be read at all.
    pub fn check(&self) -> Result<()> {
        let times = self.processors.read_times()?;
        if times.is_empty() {
            return Err(MonitorError::sampling_error("no processing units available"));
        }
        Ok(())
    }

    async fn read_disk(&self) -> DiskSpaceReading {
        let filesystem = Arc::clone(&self.filesystem);
        let mount_point = self.mount_point.clone();

        let capacity = task::spawn_blocking(move || filesystem.capacity(&mount_point))
            .await
            .unwrap_or_else(|e| {
                Err(MonitorError::disk_query_error(format!(
                    "disk query task failed: {}",
                    e
                )))
            });

        match capacity {
            Ok(capacity) => DiskSpaceReading::from_capacity(capacity),
            Err(e) => {
                warn!(
                    "Disk query for {} failed, reporting fallback capacity: {}",
                    self.mount_point.display(),
                    e
                );
                DiskSpaceReading::fallback()
            }
        }
    }
}

impl Default for ResourceSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsProvider for ResourceSampler {
    async fn sample(&self) -> Result<SystemSnapshot> {
        ResourceSampler::sample(self).await
    }

    async fn check(&self) -> Result<()> {
        ResourceSampler::check(self)
    }
}

/// Two-phase CPU measurement: read counters, sleep for `window`, read again.
///
/// The sleep yields to the runtime so concurrent measurements overlap.
/// `core_count` comes from the second read.
pub async fn measure_cpu(source: &dyn ProcessorTimeSource, window: Duration) -> Result<CpuReading> {
    let start = source.read_times()?;
    time::sleep(window).await;
    let end = source.read_times()?;

    if end.is_empty() {
        return Err(MonitorError::sampling_error("no processing units available"));
    }

    Ok(CpuReading {
        usage_percent: usage_percent(&start, &end),
        core_count: end.len() as u32,
    })
}

/// Mean busy percentage across units present in both reads, rounded and
/// clamped to 0..=100.
///
/// A unit whose total counter did not advance contributes 0. Units are
/// matched by id; a unit seen in only one read is left out of the mean.
pub fn usage_percent(start: &[CpuTimes], end: &[CpuTimes]) -> u8 {
    let before: HashMap<usize, &CpuTimes> = start.iter().map(|t| (t.id, t)).collect();

    let per_unit: Vec<f64> = end
        .iter()
        .filter_map(|after| before.get(&after.id).map(|before| unit_usage(before, after)))
        .collect();

    if per_unit.is_empty() {
        return 0;
    }

    let mean = per_unit.iter().sum::<f64>() / per_unit.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

fn unit_usage(before: &CpuTimes, after: &CpuTimes) -> f64 {
    let total_delta = after.total.saturating_sub(before.total);
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = after.idle.saturating_sub(before.idle);
    (1.0 - idle_delta as f64 / total_delta as f64) * 100.0
}
