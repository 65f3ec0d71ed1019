//! Dashboard state and the per-tick state transitions
//!
//! Everything the tick pipeline mutates lives in one [`DashboardState`].
//! [`DashboardState::apply_success`] and [`DashboardState::apply_failure`]
//! are the only writers of the live display, the window and the log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::acquisition::FetchError;
use crate::alerts::{self, AlarmController, AlarmOutcome, AlarmSession, AlarmSink};
use crate::config::HiveConfig;
use crate::logbook::{LogRecorder, Sampler};
use crate::types::{format, AcousticStatus, AlertCondition, Metric, Reading, Thresholds};
use crate::window::{ChannelStats, TelemetryWindow, WindowSample};

// ============================================================================
// Live display
// ============================================================================

/// Values currently shown on the live tiles.
///
/// After a failed tick every field is unavailable; the previous values are
/// not kept, so a stale number is never mistaken for a live one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveDisplay {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub net_weight_kg: Option<f64>,
    pub acoustic: Option<AcousticStatus>,
    pub online: bool,
    pub last_updated: Option<DateTime<Utc>>,
    /// Conditions that fired on the latest successful tick
    pub indicators: Vec<AlertCondition>,
    pub last_error: Option<String>,
}

/// Formatted tile text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveTiles {
    pub temperature: String,
    pub humidity: String,
    pub weight: String,
    pub acoustic: String,
}

impl LiveDisplay {
    pub fn tiles(&self) -> LiveTiles {
        LiveTiles {
            temperature: format::temperature(self.temperature_c),
            humidity: format::humidity(self.humidity_pct),
            weight: format::weight(self.net_weight_kg),
            acoustic: self
                .acoustic
                .map_or_else(|| format::UNAVAILABLE.to_string(), |a| a.to_string()),
        }
    }
}

// ============================================================================
// Detail view
// ============================================================================

/// One metric's trend, bound to the window while open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub metric: Metric,
    pub title: String,
    pub unit: String,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub stats: Option<ChannelStats>,
}

impl DetailView {
    pub fn from_window(metric: Metric, window: &TelemetryWindow) -> Self {
        let snapshot = window.snapshot();
        Self {
            metric,
            title: metric.title().to_string(),
            unit: metric.unit().to_string(),
            labels: snapshot.labels,
            values: window.channel(metric),
            stats: window.stats(metric),
        }
    }
}

// ============================================================================
// Tick bookkeeping
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickOrigin {
    Timer,
    Manual,
    Startup,
}

/// How a tick may react to alert conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmMode {
    Audible,
    /// Notify the sink but never open a pulsing session
    VisualOnly,
    /// Polling was stopped after this tick was issued; never start a session
    Suppressed,
}

impl AlarmMode {
    pub fn from_audio_setting(audio_enabled: bool) -> Self {
        if audio_enabled {
            AlarmMode::Audible
        } else {
            AlarmMode::VisualOnly
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickCounters {
    pub ticks: u64,
    pub successes: u64,
    pub failures: u64,
    pub consecutive_failures: u32,
    pub last_success: Option<DateTime<Utc>>,
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub sequence: u64,
    pub origin: TickOrigin,
    pub online: bool,
    pub conditions: Vec<AlertCondition>,
    pub alarm_started: bool,
    pub logged: bool,
    pub window_len: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmStatus {
    pub sounding: bool,
    pub session: Option<AlarmSession>,
    pub sessions_started: u64,
}

// ============================================================================
// Dashboard state
// ============================================================================

#[derive(Debug)]
pub struct DashboardState {
    pub live: LiveDisplay,
    pub window: TelemetryWindow,
    pub logbook: LogRecorder,
    pub alarm: AlarmController,
    pub detail: Option<DetailView>,
    pub counters: TickCounters,
    offline_warn_after: u32,
}

impl DashboardState {
    pub fn new(config: &HiveConfig, sampler: Box<dyn Sampler>, alarm_sink: Arc<dyn AlarmSink>) -> Self {
        Self {
            live: LiveDisplay::default(),
            window: TelemetryWindow::new(config.window.capacity),
            logbook: LogRecorder::new(sampler, config.logbook.display_cap),
            alarm: AlarmController::new(alarm_sink, config.alarm.pulse_interval()),
            detail: None,
            counters: TickCounters::default(),
            offline_warn_after: config.pipeline.offline_warn_after,
        }
    }

    /// Apply a successful fetch.
    ///
    /// Order: net weight, live display, alert evaluation and alarm, window
    /// push and detail refresh, then the sampled log entry.
    pub fn apply_success(
        &mut self,
        sequence: u64,
        origin: TickOrigin,
        reading: &Reading,
        thresholds: &Thresholds,
        alarm_mode: AlarmMode,
    ) -> TickReport {
        let net_weight = reading.net_weight_kg(thresholds.tare_weight_kg);

        if self.offline_warn_after > 0 && self.counters.consecutive_failures >= self.offline_warn_after {
            tracing::info!(
                failed_ticks = self.counters.consecutive_failures,
                "Sensor back online"
            );
        }

        self.counters.ticks += 1;
        self.counters.successes += 1;
        self.counters.consecutive_failures = 0;
        self.counters.last_success = Some(reading.timestamp);

        let conditions = alerts::evaluate(reading, thresholds);

        self.live = LiveDisplay {
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct,
            net_weight_kg: net_weight,
            acoustic: Some(reading.acoustic),
            online: true,
            last_updated: Some(reading.timestamp),
            indicators: conditions.clone(),
            last_error: None,
        };

        let alarm_started = match alarm_mode {
            AlarmMode::Suppressed => false,
            AlarmMode::Audible | AlarmMode::VisualOnly => matches!(
                self.alarm.raise(&conditions, alarm_mode == AlarmMode::Audible),
                AlarmOutcome::Started(_)
            ),
        };

        self.window
            .push(WindowSample::from_reading(reading, thresholds.tare_weight_kg));
        if let Some(metric) = self.detail.as_ref().map(|d| d.metric) {
            self.detail = Some(DetailView::from_window(metric, &self.window));
        }

        let logged = self
            .logbook
            .maybe_record(reading, net_weight, &conditions)
            .is_some();

        TickReport {
            sequence,
            origin,
            online: true,
            conditions,
            alarm_started,
            logged,
            window_len: self.window.len(),
            error: None,
        }
    }

    /// Apply a failed fetch: sentinels on the display, nothing else moves.
    pub fn apply_failure(&mut self, sequence: u64, origin: TickOrigin, error: &FetchError) -> TickReport {
        self.counters.ticks += 1;
        self.counters.failures += 1;
        self.counters.consecutive_failures = self.counters.consecutive_failures.saturating_add(1);

        if self.offline_warn_after > 0 && self.counters.consecutive_failures == self.offline_warn_after {
            tracing::warn!(
                consecutive_failures = self.counters.consecutive_failures,
                last_success = ?self.counters.last_success,
                "Sensor offline"
            );
        }

        self.live = LiveDisplay {
            online: false,
            last_updated: Some(Utc::now()),
            last_error: Some(error.to_string()),
            ..LiveDisplay::default()
        };

        TickReport {
            sequence,
            origin,
            online: false,
            conditions: Vec::new(),
            alarm_started: false,
            logged: false,
            window_len: self.window.len(),
            error: Some(error.to_string()),
        }
    }

    pub fn open_detail(&mut self, metric: Metric) -> DetailView {
        let view = DetailView::from_window(metric, &self.window);
        self.detail = Some(view.clone());
        view
    }

    /// Close the detail view. The window is untouched.
    pub fn close_detail(&mut self) -> bool {
        self.detail.take().is_some()
    }

    pub fn alarm_status(&self) -> AlarmStatus {
        AlarmStatus {
            sounding: self.alarm.is_sounding(),
            session: self.alarm.session().cloned(),
            sessions_started: self.alarm.sessions_started(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::TracingAlarmSink;
    use crate::logbook::{AlwaysSample, NeverSample};
    use std::time::Duration;

    fn state(sampler: Box<dyn Sampler>) -> DashboardState {
        DashboardState::new(&HiveConfig::default(), sampler, Arc::new(TracingAlarmSink))
    }

    fn reading(temp: f64, weight: f64, acoustic: AcousticStatus) -> Reading {
        Reading {
            temperature_c: Some(temp),
            humidity_pct: Some(60),
            raw_weight_kg: Some(weight),
            acoustic,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn aggressive_payload_scenario() {
        let mut state = state(Box::new(AlwaysSample));
        let report = state.apply_success(
            0,
            TickOrigin::Manual,
            &reading(34.2, 5.3, AcousticStatus::Aggressive),
            &Thresholds::default(),
            AlarmMode::Audible,
        );

        let tiles = state.live.tiles();
        assert_eq!(tiles.temperature, "34.2°C");
        assert_eq!(tiles.humidity, "60%");
        assert_eq!(tiles.weight, "3.30 kg");
        assert!(report.conditions.contains(&AlertCondition::AggressiveAcoustic));
        assert!(report.alarm_started);
        assert!(report.logged);
        assert_eq!(
            state.logbook.history()[0].severity,
            crate::logbook::LogSeverity::Warning
        );
        state.alarm.silence();
    }

    #[tokio::test]
    async fn failure_shows_sentinels_and_leaves_window() {
        let mut state = state(Box::new(AlwaysSample));
        state.apply_success(0, TickOrigin::Timer, &reading(30.0, 4.0, AcousticStatus::Normal), &Thresholds::default(), AlarmMode::Audible);
        let logged_before = state.logbook.history().len();

        let report = state.apply_failure(1, TickOrigin::Timer, &FetchError::Timeout(Duration::from_millis(1500)));

        assert!(!report.online);
        assert_eq!(state.window.len(), 1);
        assert_eq!(state.logbook.history().len(), logged_before);
        let tiles = state.live.tiles();
        assert_eq!(tiles.temperature, "--°C");
        assert_eq!(tiles.humidity, "--%");
        assert_eq!(tiles.weight, "-- kg");
        assert_eq!(tiles.acoustic, "--");
        assert_eq!(state.counters.consecutive_failures, 1);
    }

    #[tokio::test]
    async fn net_weight_never_negative() {
        let mut state = state(Box::new(NeverSample));
        state.apply_success(0, TickOrigin::Timer, &reading(30.0, 1.5, AcousticStatus::Normal), &Thresholds::default(), AlarmMode::Audible);
        assert_eq!(state.live.tiles().weight, "0.00 kg");
    }

    #[tokio::test]
    async fn open_detail_follows_new_samples() {
        let mut state = state(Box::new(NeverSample));
        state.apply_success(0, TickOrigin::Timer, &reading(30.0, 4.0, AcousticStatus::Normal), &Thresholds::default(), AlarmMode::Audible);

        let view = state.open_detail(Metric::Temperature);
        assert_eq!(view.values.len(), 1);
        assert_eq!(view.title, "Temperature Trend");

        state.apply_success(1, TickOrigin::Timer, &reading(31.0, 4.0, AcousticStatus::Normal), &Thresholds::default(), AlarmMode::Audible);
        let detail = state.detail.as_ref().unwrap();
        assert_eq!(detail.values, vec![Some(30.0), Some(31.0)]);
        assert_eq!(detail.stats.unwrap().avg, 30.5);

        assert!(state.close_detail());
        assert!(!state.close_detail());
        assert_eq!(state.window.len(), 2);
    }

    #[tokio::test]
    async fn success_resets_failure_run() {
        let mut state = state(Box::new(NeverSample));
        for seq in 0..3 {
            state.apply_failure(seq, TickOrigin::Timer, &FetchError::HttpStatus(502));
        }
        assert_eq!(state.counters.consecutive_failures, 3);

        state.apply_success(3, TickOrigin::Timer, &reading(30.0, 4.0, AcousticStatus::Normal), &Thresholds::default(), AlarmMode::Audible);
        assert_eq!(state.counters.consecutive_failures, 0);
        assert_eq!(state.counters.ticks, 4);
        assert_eq!(state.counters.failures, 3);
    }

    #[tokio::test]
    async fn suppressed_tick_updates_display_without_alarm() {
        let mut state = state(Box::new(AlwaysSample));
        let report = state.apply_success(
            0,
            TickOrigin::Timer,
            &reading(36.0, 4.0, AcousticStatus::Aggressive),
            &Thresholds::default(),
            AlarmMode::Suppressed,
        );

        assert_eq!(report.conditions.len(), 2);
        assert!(!report.alarm_started);
        assert!(!state.alarm.is_sounding());
        assert_eq!(state.alarm.sessions_started(), 0);
        assert_eq!(state.live.indicators, report.conditions);
        assert!(report.logged);
    }

    #[tokio::test]
    async fn tare_comes_from_thresholds() {
        let mut state = state(Box::new(NeverSample));
        let thresholds = Thresholds {
            tare_weight_kg: 1.0,
            ..Thresholds::default()
        };
        state.apply_success(
            0,
            TickOrigin::Timer,
            &reading(30.0, 5.3, AcousticStatus::Normal),
            &thresholds,
            AlarmMode::Audible,
        );

        assert_eq!(state.live.tiles().weight, "4.30 kg");
        assert_eq!(state.window.channel(Metric::Weight), vec![Some(4.3)]);
    }
}
