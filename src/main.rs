//! Mint Monitor binary
//!
//! Serves host CPU and disk telemetry for the mint dashboard.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use mint_monitor::{
    start_web_server, ResourceSampler, SystemSnapshot, WebConfig, DEFAULT_MOUNT_POINT,
    DEFAULT_SAMPLE_WINDOW_MS, DEFAULT_WEB_PORT,
};
use std::sync::Arc;
use sysinfo::System;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "mint_monitor")]
#[command(about = "Host telemetry for the mint dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Samples CPU usage and disk capacity and serves them as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, global = true, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, global = true, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Mount point whose disk capacity is reported
    #[arg(short, long, global = true, default_value = DEFAULT_MOUNT_POINT)]
    mount_point: String,

    /// CPU sampling window in milliseconds
    #[arg(short, long, global = true, default_value_t = DEFAULT_SAMPLE_WINDOW_MS)]
    window_ms: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve(ServeArgs),

    /// Take a single snapshot and exit
    Snapshot(SnapshotArgs),

    /// Show host information
    Info,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(&cli, args).await?,
        Some(Commands::Info) => info_command(),
        None => serve_command(&cli, &ServeArgs::default()).await?,
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    Ok(())
}

fn web_config(cli: &Cli) -> WebConfig {
    WebConfig::new(&cli.host, cli.port)
        .with_mount_point(&cli.mount_point)
        .with_sample_window(cli.window_ms)
}

fn sampler_for(config: &WebConfig) -> ResourceSampler {
    ResourceSampler::new()
        .with_mount_point(&config.mount_point)
        .with_window(config.sample_window())
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    let config = web_config(cli).with_cors(!args.no_cors);
    config.validate()?;

    info!("Web server configuration:");
    info!("  - Bind address: {}", config.bind_address());
    info!("  - CORS enabled: {}", config.enable_cors);
    info!("  - Mount point: {}", config.mount_point);
    info!("  - Sample window: {}ms", config.sample_window_ms);

    let sampler = sampler_for(&config);
    start_web_server(config, Arc::new(sampler))
        .await
        .context("web server terminated with an error")?;

    Ok(())
}

async fn snapshot_command(cli: &Cli, args: &SnapshotArgs) -> anyhow::Result<()> {
    let config = web_config(cli);
    config.validate()?;

    let snapshot = sampler_for(&config)
        .sample()
        .await
        .context("failed to sample system resources")?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        "pretty" => print_pretty_snapshot(&config, &snapshot),
        other => bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

fn info_command() {
    let system = System::new_all();

    println!("Host Information");
    println!("================");
    println!(
        "  Hostname: {}",
        System::host_name().unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "  OS: {} {}",
        System::name().unwrap_or_else(|| "unknown".to_string()),
        System::os_version().unwrap_or_default()
    );
    println!(
        "  Kernel: {}",
        System::kernel_version().unwrap_or_else(|| "unknown".to_string())
    );
    println!("  Uptime: {} seconds", System::uptime());

    let cpus = system.cpus();
    let model = cpus.first().map(|cpu| cpu.brand()).unwrap_or("unknown");
    println!("  CPU: {} ({} logical cores)", model, cpus.len());
}

fn print_pretty_snapshot(config: &WebConfig, snapshot: &SystemSnapshot) {
    println!(
        "System Snapshot ({})",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("==========================================");
    println!();

    println!("CPU:");
    println!("  Usage: {}%", snapshot.cpu.usage_percent);
    println!("  Cores: {}", snapshot.cpu.core_count);
    println!();

    println!("Disk ({}):", config.mount_point);
    println!("  Free: {}", snapshot.disk_space.free_label);
    println!("  Total: {}", snapshot.disk_space.total_label);
    println!("  Free: {}%", snapshot.disk_space.free_percent);
    if snapshot.disk_space.is_fallback {
        println!("  Note: capacity query failed, placeholder values shown");
    }
}
