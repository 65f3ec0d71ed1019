//! One poll-fetch-update cycle
//!
//! [`TickPipeline::run`] is shared by the timer, manual refresh and the
//! startup tick. The fetch runs without holding any lock; only the apply
//! phase takes the state write lock, and only once the gate says it is this
//! tick's turn.
//!
//! Every tick carries the run epoch it was issued under. Stopping the
//! scheduler advances the epoch, and a tick from an older epoch still
//! updates the display but may not start an alarm.

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::gate::{GateTicket, SequenceGate};
use super::state::{AlarmMode, DashboardState, TickOrigin, TickReport};
use crate::acquisition::TelemetrySource;
use crate::storage::Settings;
use crate::types::Thresholds;

pub struct TickPipeline {
    source: Arc<dyn TelemetrySource>,
    state: Arc<RwLock<DashboardState>>,
    settings: Arc<ArcSwap<Settings>>,
    thresholds: Thresholds,
    gate: SequenceGate,
    epoch: AtomicU64,
}

impl TickPipeline {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        state: Arc<RwLock<DashboardState>>,
        settings: Arc<ArcSwap<Settings>>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            source,
            state,
            settings,
            thresholds,
            gate: SequenceGate::new(),
            epoch: AtomicU64::new(0),
        }
    }

    /// Reserve this tick's place in the apply order.
    pub fn issue_ticket(&self) -> GateTicket {
        self.gate.issue()
    }

    /// Current run epoch. Capture it alongside the ticket.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Invalidate alarms from every tick issued so far.
    ///
    /// A tick that already applied before the bump may have started a
    /// session, so silence the alarm after calling this.
    pub fn advance_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn state(&self) -> &Arc<RwLock<DashboardState>> {
        &self.state
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Run one tick: fetch, wait for turn, apply.
    pub async fn run(&self, ticket: GateTicket, origin: TickOrigin, issued_epoch: u64) -> TickReport {
        let sequence = ticket.sequence();
        let fetched = self.source.fetch_reading().await;

        ticket.wait_turn().await;

        let report = {
            let mut state = self.state.write().await;
            match &fetched {
                Ok(reading) => {
                    let alarm_mode = if issued_epoch == self.epoch() {
                        AlarmMode::from_audio_setting(self.settings.load().audio_enabled)
                    } else {
                        debug!(sequence, issued_epoch, "Tick outlived its polling run, alarm suppressed");
                        AlarmMode::Suppressed
                    };
                    state.apply_success(sequence, origin, reading, &self.thresholds, alarm_mode)
                }
                Err(e) => state.apply_failure(sequence, origin, e),
            }
        };
        drop(ticket);

        match &fetched {
            Ok(_) => debug!(
                sequence,
                origin = ?origin,
                conditions = report.conditions.len(),
                logged = report.logged,
                window_len = report.window_len,
                "Tick applied"
            ),
            Err(e) => warn!(
                sequence,
                origin = ?origin,
                source = self.source.source_name(),
                reason = e.reason(),
                error = %e,
                "Tick failed, sensor offline"
            ),
        }

        report
    }
}
