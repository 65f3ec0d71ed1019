//! Dashboard facade
//!
//! Owns the state, settings, scheduler and settings store, and exposes the
//! operations the HTTP layer and the CLI call. Lifecycle:
//! `init` → `start` → (`stop` / `start` …) → `dispose`.

use arc_swap::ArcSwap;
use chrono::{Local, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::scheduler::PollingScheduler;
use super::state::{AlarmStatus, DashboardState, DetailView, LiveDisplay, LiveTiles, TickCounters, TickOrigin, TickReport};
use super::tick::TickPipeline;
use crate::acquisition::{StreamEndpoints, StreamUrlError, TelemetrySource};
use crate::alerts::{AlarmSession, AlarmSink, TracingAlarmSink};
use crate::config::HiveConfig;
use crate::logbook::{export_filename, ExportError, LogEntry, RandomSampler, Sampler};
use crate::storage::{Settings, SettingsError, SettingsStore, StorageError};
use crate::types::Metric;
use crate::window::WindowSnapshot;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("settings store: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("stream URLs unavailable: {0}")]
    Streams(#[from] StreamUrlError),
}

/// Live tiles plus the raw values and alarm status behind them.
#[derive(Debug, Clone, Serialize)]
pub struct LiveView {
    pub tiles: LiveTiles,
    pub display: LiveDisplay,
    pub alarm: AlarmStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub polling: bool,
    pub refresh_interval_ms: Option<u64>,
    pub counters: TickCounters,
    pub window_len: usize,
    pub window_capacity: usize,
    pub log_entries: usize,
    pub sampler: String,
    pub settings_backend: &'static str,
}

pub struct Dashboard {
    config: Arc<HiveConfig>,
    state: Arc<RwLock<DashboardState>>,
    settings: Arc<ArcSwap<Settings>>,
    store: Arc<dyn SettingsStore>,
    scheduler: PollingScheduler,
    shutdown: CancellationToken,
}

impl Dashboard {
    /// Build a dashboard with the configured random log sampler and the
    /// tracing alarm sink.
    pub fn init(
        config: Arc<HiveConfig>,
        source: Arc<dyn TelemetrySource>,
        store: Arc<dyn SettingsStore>,
    ) -> Result<Self, DashboardError> {
        let sampler = Box::new(RandomSampler::new(config.logbook.sample_probability));
        Self::init_with(config, source, store, sampler, Arc::new(TracingAlarmSink))
    }

    /// Build a dashboard with an explicit sampler and alarm sink.
    pub fn init_with(
        config: Arc<HiveConfig>,
        source: Arc<dyn TelemetrySource>,
        store: Arc<dyn SettingsStore>,
        sampler: Box<dyn Sampler>,
        alarm_sink: Arc<dyn AlarmSink>,
    ) -> Result<Self, DashboardError> {
        let settings = load_settings(store.as_ref())?;
        info!(
            refresh_interval_ms = settings.refresh_interval_ms,
            audio_enabled = settings.audio_enabled,
            backend = store.backend_name(),
            "Settings loaded"
        );

        let state = Arc::new(RwLock::new(DashboardState::new(&config, sampler, alarm_sink)));
        let settings = Arc::new(ArcSwap::from_pointee(settings));
        let pipeline = Arc::new(TickPipeline::new(
            source,
            Arc::clone(&state),
            Arc::clone(&settings),
            config.thresholds(),
        ));
        let shutdown = CancellationToken::new();
        let scheduler = PollingScheduler::new(pipeline, shutdown.clone());

        Ok(Self {
            config,
            state,
            settings,
            store,
            scheduler,
            shutdown,
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Arm the timer with the current refresh interval and fire an initial
    /// tick so the display fills without waiting a full period.
    pub fn start(&self) {
        self.scheduler.start(self.settings.load().refresh_interval());
        self.scheduler.spawn_tick(TickOrigin::Startup);
    }

    /// Cancel polling and silence any alarm. Data is kept.
    pub async fn stop(&self) {
        self.scheduler.stop().await;
    }

    /// Stop, then wait for in-flight ticks to finish.
    pub async fn dispose(self) {
        self.scheduler.stop().await;
        self.shutdown.cancel();
        self.scheduler.drain().await;
        info!("Dashboard disposed");
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn polling_interval(&self) -> Option<Duration> {
        self.scheduler.period()
    }

    pub fn config(&self) -> &HiveConfig {
        &self.config
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Manual refresh: one tick now, timer schedule untouched.
    pub async fn refresh(&self) -> TickReport {
        self.scheduler.tick(TickOrigin::Manual).await
    }

    pub fn settings(&self) -> Settings {
        **self.settings.load()
    }

    /// Validate, persist and apply settings; restarts the timer if polling.
    pub fn save_settings(&self, settings: Settings) -> Result<Settings, DashboardError> {
        settings.validate()?;
        self.store.save(&settings)?;
        self.apply_settings(settings);
        info!(
            refresh_interval_ms = settings.refresh_interval_ms,
            audio_enabled = settings.audio_enabled,
            "Settings saved"
        );
        Ok(settings)
    }

    /// Clear persisted settings and fall back to defaults.
    pub fn reset_settings(&self) -> Result<Settings, DashboardError> {
        self.store.clear()?;
        let settings = Settings::default();
        self.apply_settings(settings);
        info!("Settings reset to defaults");
        Ok(settings)
    }

    fn apply_settings(&self, settings: Settings) {
        self.settings.store(Arc::new(settings));
        self.scheduler.restart_if_running(settings.refresh_interval());
    }

    pub async fn acknowledge_alarm(&self) -> Option<AlarmSession> {
        self.state.write().await.alarm.acknowledge()
    }

    pub async fn open_detail(&self, metric: Metric) -> DetailView {
        self.state.write().await.open_detail(metric)
    }

    pub async fn detail(&self) -> Option<DetailView> {
        self.state.read().await.detail.clone()
    }

    pub async fn close_detail(&self) -> bool {
        self.state.write().await.close_detail()
    }

    pub async fn live(&self) -> LiveView {
        let state = self.state.read().await;
        LiveView {
            tiles: state.live.tiles(),
            display: state.live.clone(),
            alarm: state.alarm_status(),
        }
    }

    pub async fn history(&self) -> WindowSnapshot {
        self.state.read().await.window.snapshot()
    }

    /// The capped display list, newest first.
    pub async fn logs(&self) -> Vec<LogEntry> {
        self.state.read().await.logbook.display().cloned().collect()
    }

    pub async fn clear_logs(&self) -> usize {
        let removed = self.state.write().await.logbook.clear();
        info!(removed, "Event log cleared");
        removed
    }

    pub async fn export_csv(&self) -> Result<CsvExport, DashboardError> {
        let content = self.state.read().await.logbook.export_csv()?;
        Ok(CsvExport {
            filename: export_filename(&Local::now()),
            content,
        })
    }

    pub fn streams(&self) -> Result<StreamEndpoints, DashboardError> {
        Ok(StreamEndpoints::derive(
            &self.config.sensor.endpoint_url,
            Utc::now().timestamp_millis(),
        )?)
    }

    pub async fn health(&self) -> HealthReport {
        let state = self.state.read().await;
        HealthReport {
            polling: self.scheduler.is_running(),
            refresh_interval_ms: self.scheduler.period().map(|p| p.as_millis() as u64),
            counters: state.counters.clone(),
            window_len: state.window.len(),
            window_capacity: state.window.capacity(),
            log_entries: state.logbook.history().len(),
            sampler: state.logbook.sampler_name(),
            settings_backend: self.store.backend_name(),
        }
    }
}

fn load_settings(store: &dyn SettingsStore) -> Result<Settings, DashboardError> {
    let Some(settings) = store.load()? else {
        return Ok(Settings::default());
    };

    match settings.validate() {
        Ok(()) => Ok(settings),
        Err(e) => {
            warn!(error = %e, "Persisted settings rejected, using defaults");
            Ok(Settings::default())
        }
    }
}
