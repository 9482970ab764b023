use mint_monitor::{
    error::MonitorError,
    metrics::{format_bytes, measure_cpu, usage_percent},
    CpuTimes, FilesystemCapacitySource, FsCapacity, ProcessorTimeSource, ResourceSampler,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays a fixed sequence of counter reads.
struct ScriptedProcessors {
    reads: Mutex<Vec<Vec<CpuTimes>>>,
}

impl ScriptedProcessors {
    fn new(reads: Vec<Vec<CpuTimes>>) -> Self {
        Self {
            reads: Mutex::new(reads),
        }
    }
}

impl ProcessorTimeSource for ScriptedProcessors {
    fn read_times(&self) -> mint_monitor::Result<Vec<CpuTimes>> {
        let mut reads = self.reads.lock().unwrap();
        if reads.is_empty() {
            return Err(MonitorError::sampling_error("no more scripted reads"));
        }
        Ok(reads.remove(0))
    }
}

/// Every read advances each core by 100 ticks, 25 of them idle.
struct TickingProcessors {
    cores: usize,
    ticks: AtomicU64,
}

impl ProcessorTimeSource for TickingProcessors {
    fn read_times(&self) -> mint_monitor::Result<Vec<CpuTimes>> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.cores)
            .map(|id| CpuTimes::new(id, tick * 25, tick * 100))
            .collect())
    }
}

struct UnavailableProcessors;

impl ProcessorTimeSource for UnavailableProcessors {
    fn read_times(&self) -> mint_monitor::Result<Vec<CpuTimes>> {
        Err(MonitorError::sampling_error("processor counters unavailable"))
    }
}

/// Records the mount point it was asked about.
struct FixedCapacity {
    capacity: FsCapacity,
    queried: Mutex<Option<PathBuf>>,
}

impl FixedCapacity {
    fn new(capacity: FsCapacity) -> Self {
        Self {
            capacity,
            queried: Mutex::new(None),
        }
    }
}

impl FilesystemCapacitySource for FixedCapacity {
    fn capacity(&self, mount_point: &Path) -> mint_monitor::Result<FsCapacity> {
        *self.queried.lock().unwrap() = Some(mount_point.to_path_buf());
        Ok(self.capacity)
    }
}

struct UnavailableCapacity;

impl FilesystemCapacitySource for UnavailableCapacity {
    fn capacity(&self, mount_point: &Path) -> mint_monitor::Result<FsCapacity> {
        Err(MonitorError::disk_query_error(format!(
            "statfs unsupported for {}",
            mount_point.display()
        )))
    }
}

/// Blocks the calling thread before answering, like a hung network mount.
struct StallingCapacity {
    stall: Duration,
}

impl FilesystemCapacitySource for StallingCapacity {
    fn capacity(&self, _mount_point: &Path) -> mint_monitor::Result<FsCapacity> {
        std::thread::sleep(self.stall);
        Ok(HALF_FULL_GIB)
    }
}

fn cores(readings: &[(u64, u64)]) -> Vec<CpuTimes> {
    readings
        .iter()
        .enumerate()
        .map(|(id, &(idle, total))| CpuTimes::new(id, idle, total))
        .collect()
}

const HALF_FULL_GIB: FsCapacity = FsCapacity {
    block_size: 4096,
    total_blocks: 262_144,
    free_blocks: 131_072,
};

#[test]
fn test_usage_matches_mean_formula() {
    let start = cores(&[(1000, 2000), (1000, 2000), (1000, 2000), (1000, 2000)]);
    let end = cores(&[(1090, 2100), (1050, 2100), (1000, 2100), (1100, 2100)]);

    // 10%, 50%, 100%, 0% busy
    let expected = ((10.0 + 50.0 + 100.0 + 0.0) / 4.0_f64).round() as u8;
    assert_eq!(usage_percent(&start, &end), expected);
    assert_eq!(expected, 40);
}

#[test]
fn test_usage_never_exceeds_bounds() {
    let start = cores(&[(0, 0), (0, 0)]);
    let busy = cores(&[(0, 500), (0, 700)]);
    let idle = cores(&[(500, 500), (700, 700)]);

    assert_eq!(usage_percent(&start, &busy), 100);
    assert_eq!(usage_percent(&start, &idle), 0);

    // Idle advanced further than total between reads.
    let start = cores(&[(100, 200)]);
    let skewed = cores(&[(190, 250)]);
    assert_eq!(usage_percent(&start, &skewed), 0);
}

#[test]
fn test_byte_labels() {
    assert_eq!(format_bytes(0), "0.00 B");
    assert_eq!(format_bytes(1536), "1.50 KB");
    assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
    for k in 1..=4u32 {
        let label = format_bytes(1024u64.pow(k));
        assert!(label.starts_with("1.00 "), "{} rendered as {}", 1024u64.pow(k), label);
        assert!(!label.starts_with("1024.00"));
    }
}

#[tokio::test]
async fn test_measure_cpu_with_near_zero_window() {
    let source = ScriptedProcessors::new(vec![
        cores(&[(0, 0), (0, 0)]),
        cores(&[(20, 100), (80, 100)]),
    ]);

    let reading = measure_cpu(&source, Duration::from_millis(1)).await.unwrap();
    assert_eq!(reading.usage_percent, 50);
    assert_eq!(reading.core_count, 2);
}

#[tokio::test]
async fn test_sample_populates_both_readings() {
    let processors = Arc::new(ScriptedProcessors::new(vec![
        cores(&[(0, 0)]),
        cores(&[(30, 100)]),
    ]));
    let filesystem = Arc::new(FixedCapacity::new(HALF_FULL_GIB));

    let sampler = ResourceSampler::with_sources(processors, filesystem.clone())
        .with_window(Duration::ZERO);
    let snapshot = sampler.sample().await.unwrap();

    assert_eq!(snapshot.cpu.usage_percent, 70);
    assert_eq!(snapshot.cpu.core_count, 1);
    assert_eq!(snapshot.disk_space.total_label, "1.00 GB");
    assert_eq!(snapshot.disk_space.free_label, "512.00 MB");
    assert_eq!(snapshot.disk_space.free_percent, 50);
    assert!(!snapshot.disk_space.is_fallback);
    assert_eq!(
        filesystem.queried.lock().unwrap().as_deref(),
        Some(Path::new("/"))
    );
}

#[tokio::test]
async fn test_sample_uses_configured_mount_point() {
    let filesystem = Arc::new(FixedCapacity::new(HALF_FULL_GIB));
    let sampler = ResourceSampler::with_sources(
        Arc::new(TickingProcessors {
            cores: 2,
            ticks: AtomicU64::new(0),
        }),
        filesystem.clone(),
    )
    .with_mount_point("/var/lib/mint")
    .with_window(Duration::ZERO);

    sampler.sample().await.unwrap();
    assert_eq!(
        filesystem.queried.lock().unwrap().as_deref(),
        Some(Path::new("/var/lib/mint"))
    );
}

#[tokio::test]
async fn test_disk_failure_falls_back() {
    let sampler = ResourceSampler::with_sources(
        Arc::new(TickingProcessors {
            cores: 4,
            ticks: AtomicU64::new(0),
        }),
        Arc::new(UnavailableCapacity),
    )
    .with_window(Duration::ZERO);

    let snapshot = sampler.sample().await.expect("disk failure must not fail the sample");
    assert!(snapshot.disk_space.is_fallback);
    assert_eq!(snapshot.disk_space.free_percent, 50);
    assert_eq!(snapshot.disk_space.total_label, "3.73 TB");
    assert_eq!(snapshot.cpu.usage_percent, 75);
    assert_eq!(snapshot.cpu.core_count, 4);
}

#[tokio::test]
async fn test_cpu_failure_fails_sample() {
    let sampler = ResourceSampler::with_sources(
        Arc::new(UnavailableProcessors),
        Arc::new(FixedCapacity::new(HALF_FULL_GIB)),
    )
    .with_window(Duration::ZERO);

    let err = sampler.sample().await.unwrap_err();
    assert!(matches!(err, MonitorError::Sampling(_)));
}

#[tokio::test(start_paused = true)]
async fn test_sample_waits_for_window() {
    let sampler = ResourceSampler::with_sources(
        Arc::new(TickingProcessors {
            cores: 1,
            ticks: AtomicU64::new(0),
        }),
        Arc::new(FixedCapacity::new(HALF_FULL_GIB)),
    );
    assert_eq!(sampler.window(), Duration::from_millis(100));

    let started = tokio::time::Instant::now();
    sampler.sample().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_sample_from_blocking_context() {
    let sampler = ResourceSampler::with_sources(
        Arc::new(TickingProcessors {
            cores: 2,
            ticks: AtomicU64::new(0),
        }),
        Arc::new(FixedCapacity::new(HALF_FULL_GIB)),
    )
    .with_window(Duration::from_millis(1));

    let snapshot = tokio_test::block_on(sampler.sample()).unwrap();
    assert_eq!(snapshot.cpu.core_count, 2);
}

#[tokio::test]
async fn test_stalled_disk_query_does_not_block_other_samples() {
    let stalled = ResourceSampler::with_sources(
        Arc::new(TickingProcessors {
            cores: 1,
            ticks: AtomicU64::new(0),
        }),
        Arc::new(StallingCapacity {
            stall: Duration::from_millis(600),
        }),
    )
    .with_window(Duration::from_millis(100));
    let healthy = ResourceSampler::with_sources(
        Arc::new(TickingProcessors {
            cores: 1,
            ticks: AtomicU64::new(0),
        }),
        Arc::new(FixedCapacity::new(HALF_FULL_GIB)),
    )
    .with_window(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let timed = |sampler: ResourceSampler| async move {
        let snapshot = sampler.sample().await;
        (snapshot, started.elapsed())
    };
    let ((stalled_snapshot, stalled_elapsed), (healthy_snapshot, healthy_elapsed)) =
        tokio::join!(timed(stalled), timed(healthy));

    assert_eq!(healthy_snapshot.unwrap().cpu.usage_percent, 75);
    assert!(
        healthy_elapsed < Duration::from_millis(400),
        "healthy sample took {:?}",
        healthy_elapsed
    );
    assert!(!stalled_snapshot.unwrap().disk_space.is_fallback);
    assert!(stalled_elapsed >= Duration::from_millis(600));
}
