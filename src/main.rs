//! Hive Monitor - beehive telemetry dashboard service
//!
//! Polls the hive sensor, keeps the rolling window, alarm and event log, and
//! serves them over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Poll the default endpoint and serve the API on 0.0.0.0:8080
//! cargo run --release
//!
//! # Point at a tunnelled sensor and print a single reading
//! ./hive-monitor --endpoint https://example.ngrok.app/data --once
//! ```
//!
//! # Environment Variables
//!
//! - `HIVE_CONFIG`: Path to the TOML configuration file
//! - `HIVE_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use hive_monitor::api::{create_app, ApiState};
use hive_monitor::config::HiveConfig;
use hive_monitor::pipeline::Dashboard;
use hive_monitor::storage::{InMemorySettingsStore, SettingsStore, SledSettingsStore};
use hive_monitor::SensorClient;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "hive-monitor")]
#[command(about = "Beehive telemetry dashboard service")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML configuration file (overrides HIVE_CONFIG and ./hive_config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the sensor endpoint URL
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, value_name = "HOST:PORT")]
    addr: Option<String>,

    /// Clear persisted settings before starting
    #[arg(long)]
    reset_settings: bool,

    /// Perform one tick, print the live display as JSON and exit
    #[arg(long)]
    once: bool,
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
    Poller,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HttpServer => write!(f, "HttpServer"),
            TaskName::Poller => write!(f, "Poller"),
        }
    }
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(args: &CliArgs) -> Result<HiveConfig> {
    let mut config = match &args.config {
        Some(path) => HiveConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => HiveConfig::load(),
    };

    if let Some(endpoint) = &args.endpoint {
        config.sensor.endpoint_url = endpoint.clone();
    }
    if let Some(addr) = &args.addr {
        config.server.addr = addr.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_settings_store(config: &HiveConfig, args: &CliArgs) -> Result<Arc<dyn SettingsStore>> {
    // A one-shot run must not fight a running service for the sled lock.
    if args.once {
        return Ok(Arc::new(InMemorySettingsStore::new()));
    }

    std::fs::create_dir_all(&config.storage.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.storage.data_dir.display()
        )
    })?;

    let store = SledSettingsStore::open(config.storage.settings_db_path())
        .context("Failed to open settings store")?;

    if args.reset_settings {
        store.clear().context("Failed to clear persisted settings")?;
        info!("Persisted settings cleared");
    }

    Ok(Arc::new(store))
}

// ============================================================================
// Tasks
// ============================================================================

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Spawn the poller task: start polling, then stop it on shutdown.
fn spawn_poller(
    task_set: &mut JoinSet<Result<TaskName>>,
    dashboard: Arc<Dashboard>,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[Poller] Task starting");
        dashboard.start();

        cancel_token.cancelled().await;
        dashboard.stop().await;
        info!("[Poller] Polling stopped");
        Ok(TaskName::Poller)
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("Supervisor: all tasks spawned, monitoring");

    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task_name)) => {
                info!("Supervisor: task {} completed", task_name);
                // Either task finishing means the service is winding down.
                cancel_token.cancel();
            }
            Ok(Err(e)) => {
                error!("Supervisor: task failed with error: {}", e);
                cancel_token.cancel();
                return Err(e);
            }
            Err(e) => {
                error!("Supervisor: task panicked: {}", e);
                cancel_token.cancel();
                return Err(anyhow::anyhow!("Task panicked: {}", e));
            }
        }
    }

    info!("Supervisor: all tasks completed");
    Ok(())
}

async fn run_once(dashboard: Dashboard) -> Result<()> {
    let report = dashboard.refresh().await;
    let live = dashboard.live().await;

    let output = serde_json::json!({
        "report": report,
        "live": live,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize live display")?
    );

    dashboard.dispose().await;
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = Arc::new(load_config(&args)?);

    info!(
        endpoint = %config.sensor.endpoint_url,
        timeout_ms = config.sensor.timeout_ms,
        tare_kg = config.sensor.tare_weight_kg,
        temp_max_c = config.thresholds.temp_max_c,
        "Hive Monitor starting"
    );

    let source = Arc::new(
        SensorClient::from_config(&config.sensor).context("Failed to create sensor client")?,
    );
    let store = open_settings_store(&config, &args)?;
    let dashboard = Dashboard::init(Arc::clone(&config), source, store)
        .context("Failed to initialize dashboard")?;

    if args.once {
        return run_once(dashboard).await;
    }

    let dashboard = Arc::new(dashboard);
    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.addr))?;
    info!("Dashboard API listening on http://{}/api/v1", config.server.addr);

    let app = create_app(ApiState::new(Arc::clone(&dashboard)));

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown");
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut task_set, listener, app, cancel_token.clone());
    spawn_poller(&mut task_set, Arc::clone(&dashboard), cancel_token.clone());

    let outcome = run_supervisor(&mut task_set, cancel_token).await;

    match Arc::try_unwrap(dashboard) {
        Ok(dashboard) => dashboard.dispose().await,
        Err(_) => info!("Dashboard still referenced at exit, skipping drain"),
    }

    outcome
}
