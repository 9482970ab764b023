//! Data structures for host resource readings.

use serde::{Deserialize, Serialize};

use super::format::{format_bytes, percent_of};

/// A combined CPU and disk reading taken by one query.
///
/// Serializes to the body served by `/api/system-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    /// Capacity of the sampled mount point
    pub disk_space: DiskSpaceReading,
    /// Processor utilization over the sampling window
    pub cpu: CpuReading,
}

/// Disk capacity for a single mount point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSpaceReading {
    /// Human-readable free space, e.g. `"1.50 GB"`
    #[serde(rename = "free")]
    pub free_label: String,
    /// Human-readable total space
    #[serde(rename = "total")]
    pub total_label: String,
    /// Free space as a rounded percentage of the total (0 to 100)
    #[serde(rename = "percentFree")]
    pub free_percent: u8,
    /// Free space in bytes
    #[serde(skip)]
    pub free_bytes: u64,
    /// Total space in bytes
    #[serde(skip)]
    pub total_bytes: u64,
    /// Set when the filesystem query failed and placeholder capacity was used.
    /// Not part of the wire format.
    #[serde(skip)]
    pub is_fallback: bool,
}

/// Processor utilization averaged across logical cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuReading {
    /// Mean busy percentage across cores (0 to 100)
    #[serde(rename = "usage")]
    pub usage_percent: u8,
    /// Logical processing units seen at read time
    #[serde(rename = "cores")]
    pub core_count: u32,
}

/// Cumulative time counters for one logical processing unit.
///
/// Units are whatever the platform reports (clock ticks on Linux); only
/// deltas between two reads are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTimes {
    /// Index of the unit as reported by the host (`cpu3` has id 3)
    pub id: usize,
    /// Time spent idle
    pub idle: u64,
    /// Sum of the time spent in every state, idle included
    pub total: u64,
}

/// Raw capacity counters for a filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsCapacity {
    /// Fundamental block size in bytes
    pub block_size: u64,
    /// Total data blocks in the filesystem
    pub total_blocks: u64,
    /// Free blocks
    pub free_blocks: u64,
}

impl CpuTimes {
    pub fn new(id: usize, idle: u64, total: u64) -> Self {
        Self { id, idle, total }
    }
}

impl FsCapacity {
    /// Placeholder capacity reported when the real query is unavailable:
    /// 4 KiB blocks, one billion of them, half free.
    pub const FALLBACK: FsCapacity = FsCapacity {
        block_size: 4096,
        total_blocks: 1_000_000_000,
        free_blocks: 500_000_000,
    };

    pub fn total_bytes(&self) -> u64 {
        self.total_blocks.saturating_mul(self.block_size)
    }

    /// Free bytes, never exceeding [`FsCapacity::total_bytes`].
    pub fn free_bytes(&self) -> u64 {
        self.free_blocks
            .saturating_mul(self.block_size)
            .min(self.total_bytes())
    }
}

impl DiskSpaceReading {
    /// Build a reading from capacity counters.
    pub fn from_capacity(capacity: FsCapacity) -> Self {
        let total_bytes = capacity.total_bytes();
        let free_bytes = capacity.free_bytes();

        Self {
            free_label: format_bytes(free_bytes),
            total_label: format_bytes(total_bytes),
            free_percent: percent_of(free_bytes, total_bytes),
            free_bytes,
            total_bytes,
            is_fallback: false,
        }
    }

    /// Reading built from [`FsCapacity::FALLBACK`].
    pub fn fallback() -> Self {
        Self {
            is_fallback: true,
            ..Self::from_capacity(FsCapacity::FALLBACK)
        }
    }
}
