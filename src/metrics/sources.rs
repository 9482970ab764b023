//! Host-backed implementations of the sampling sources.

use crate::error::{MonitorError, Result};
use crate::metrics::data::{CpuTimes, FsCapacity};
use crate::metrics::traits::{FilesystemCapacitySource, ProcessorTimeSource};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of leading `/proc/stat` fields summed into a unit's total
/// (user, nice, system, idle, iowait, irq, softirq, steal). The guest
/// columns that follow are already accounted for in user and nice.
const STAT_FIELDS: usize = 8;

/// Position of the idle counter within a `cpuN` line.
const IDLE_FIELD: usize = 3;

/// Per-core processor times read from `/proc/stat`.
#[derive(Debug, Clone)]
pub struct ProcStatSource {
    path: PathBuf,
}

impl ProcStatSource {
    pub fn new() -> Self {
        Self::with_path("/proc/stat")
    }

    /// Read counters from a file laid out like `/proc/stat`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcStatSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorTimeSource for ProcStatSource {
    fn read_times(&self) -> Result<Vec<CpuTimes>> {
        let stat = fs::read_to_string(&self.path).map_err(|e| {
            MonitorError::sampling_error(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let times = parse_proc_stat(&stat);
        if times.is_empty() {
            return Err(MonitorError::sampling_error(format!(
                "no processing units listed in {}",
                self.path.display()
            )));
        }

        Ok(times)
    }
}

/// Parse the per-core `cpuN` lines of `/proc/stat`.
///
/// The aggregate `cpu` line and malformed lines are skipped.
pub fn parse_proc_stat(stat: &str) -> Vec<CpuTimes> {
    stat.lines().filter_map(parse_cpu_line).collect()
}

fn parse_cpu_line(line: &str) -> Option<CpuTimes> {
    let mut parts = line.split_whitespace();
    let id = parts.next()?.strip_prefix("cpu")?.parse::<usize>().ok()?;

    let fields: Vec<u64> = parts
        .take(STAT_FIELDS)
        .map(|field| field.parse::<u64>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    let idle = *fields.get(IDLE_FIELD)?;
    let total = fields.iter().sum();

    Some(CpuTimes { id, idle, total })
}

/// Filesystem capacity from `statvfs(3)` on the configured path.
///
/// Only the requested mount is queried. Free space is the total count of
/// free blocks (`f_bfree`), blocks reserved for the superuser included.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsDiskSource;

impl FilesystemCapacitySource for StatvfsDiskSource {
    #[cfg(unix)]
    fn capacity(&self, mount_point: &Path) -> Result<FsCapacity> {
        use std::ffi::CString;
        use std::mem::MaybeUninit;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(mount_point.as_os_str().as_bytes()).map_err(|_| {
            MonitorError::disk_query_error(format!(
                "invalid mount point {}",
                mount_point.display()
            ))
        })?;

        let mut stats = MaybeUninit::<libc::statvfs>::zeroed();
        let result = unsafe { libc::statvfs(c_path.as_ptr(), stats.as_mut_ptr()) };
        if result != 0 {
            return Err(MonitorError::disk_query_error(format!(
                "statvfs({}) failed: {}",
                mount_point.display(),
                std::io::Error::last_os_error()
            )));
        }
        let stats = unsafe { stats.assume_init() };

        Ok(capacity_from_statvfs(&stats))
    }

    #[cfg(not(unix))]
    fn capacity(&self, mount_point: &Path) -> Result<FsCapacity> {
        Err(MonitorError::disk_query_error(format!(
            "statvfs unavailable on this platform for {}",
            mount_point.display()
        )))
    }
}

/// Convert `statvfs` counters. Block counts are in units of `f_frsize`;
/// filesystems reporting a zero fragment size fall back to `f_bsize`.
#[cfg(unix)]
pub fn capacity_from_statvfs(stats: &libc::statvfs) -> FsCapacity {
    let block_size = match stats.f_frsize as u64 {
        0 => stats.f_bsize as u64,
        frsize => frsize,
    };

    FsCapacity {
        block_size,
        total_blocks: stats.f_blocks as u64,
        free_blocks: stats.f_bfree as u64,
    }
}
