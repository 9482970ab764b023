//! Host resource sampling and reading types.
//!
//! This module measures CPU utilization as a delta between two reads of the
//! per-core time counters and reports the capacity of a single mount point.
//! Host access sits behind [`ProcessorTimeSource`] and
//! [`FilesystemCapacitySource`] so readings can be injected in tests.

pub mod collector;
pub mod data;
pub mod format;
pub mod sources;
pub mod traits;

// Re-export commonly used items
pub use collector::{measure_cpu, usage_percent, ResourceSampler};
pub use data::{CpuReading, CpuTimes, DiskSpaceReading, FsCapacity, SystemSnapshot};
pub use format::format_bytes;
pub use sources::{ProcStatSource, StatvfsDiskSource};
pub use traits::{FilesystemCapacitySource, MetricsProvider, ProcessorTimeSource};
