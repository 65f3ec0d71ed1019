//! Alarm controller
//!
//! Two states: idle, or sounding with exactly one [`AlarmSession`]. A session
//! starts when a condition fires while idle with audio enabled, pulses
//! through the [`AlarmSink`] on a fixed interval, and ends only on
//! acknowledgement (or when the dashboard stops).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::types::AlertCondition;

/// Tone frequency of one audible pulse.
pub const PULSE_TONE_HZ: u32 = 800;

/// Output side of the alarm.
///
/// The controller decides *when* to notify and pulse; sinks decide *how*.
pub trait AlarmSink: Send + Sync + 'static {
    /// Visual notification for a condition.
    fn notify(&self, condition: &AlertCondition, at: DateTime<Utc>);

    /// One audible pulse of an active session. `pulse` counts from 1.
    fn pulse(&self, session: &AlarmSession, pulse: u64);

    /// The session was acknowledged or silenced.
    fn stopped(&self, _session: &AlarmSession) {}
}

/// Sink that reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlarmSink;

impl AlarmSink for TracingAlarmSink {
    fn notify(&self, condition: &AlertCondition, at: DateTime<Utc>) {
        tracing::warn!(
            alert = %condition,
            at = %at.format("%H:%M:%S"),
            "Hive alert"
        );
    }

    fn pulse(&self, session: &AlarmSession, pulse: u64) {
        tracing::debug!(
            pulse,
            tone_hz = PULSE_TONE_HZ,
            trigger = %session.trigger,
            "Alarm pulse"
        );
    }

    fn stopped(&self, session: &AlarmSession) {
        tracing::info!(trigger = %session.trigger, "Alarm stopped");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmSession {
    pub started_at: DateTime<Utc>,
    pub trigger: AlertCondition,
}

/// What `raise` did with a batch of conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum AlarmOutcome {
    /// No conditions fired.
    Quiet,
    /// A new session started for the first condition.
    Started(AlarmSession),
    /// A session is already sounding; nothing changed.
    AlreadySounding,
    /// Audio is disabled; a visual notification was shown.
    VisualOnly(AlertCondition),
}

struct ActiveAlarm {
    session: AlarmSession,
    cancel: CancellationToken,
}

pub struct AlarmController {
    sink: Arc<dyn AlarmSink>,
    pulse_interval: Duration,
    active: Option<ActiveAlarm>,
    sessions_started: u64,
}

impl AlarmController {
    pub fn new(sink: Arc<dyn AlarmSink>, pulse_interval: Duration) -> Self {
        Self {
            sink,
            pulse_interval,
            active: None,
            sessions_started: 0,
        }
    }

    /// React to this tick's conditions.
    ///
    /// Only the first condition may start a session. Must be called from
    /// within a Tokio runtime since starting a session spawns the pulse task.
    pub fn raise(&mut self, conditions: &[AlertCondition], audio_enabled: bool) -> AlarmOutcome {
        let Some(first) = conditions.first() else {
            return AlarmOutcome::Quiet;
        };

        if self.active.is_some() {
            return AlarmOutcome::AlreadySounding;
        }

        let now = Utc::now();
        self.sink.notify(first, now);

        if !audio_enabled {
            return AlarmOutcome::VisualOnly(*first);
        }

        let session = AlarmSession {
            started_at: now,
            trigger: *first,
        };
        let cancel = CancellationToken::new();
        self.spawn_pulses(session.clone(), cancel.clone());

        self.sessions_started += 1;
        tracing::info!(
            trigger = %session.trigger,
            interval_ms = self.pulse_interval.as_millis() as u64,
            "Alarm session started"
        );

        self.active = Some(ActiveAlarm {
            session: session.clone(),
            cancel,
        });
        AlarmOutcome::Started(session)
    }

    /// Acknowledge the alarm. Returns the closed session, if one was active.
    pub fn acknowledge(&mut self) -> Option<AlarmSession> {
        let closed = self.stop_active();
        if let Some(session) = &closed {
            tracing::info!(
                trigger = %session.trigger,
                sounded_for_ms = (Utc::now() - session.started_at).num_milliseconds(),
                "Alarm acknowledged"
            );
        }
        closed
    }

    /// Stop any pulse generator without treating it as an acknowledgement.
    pub fn silence(&mut self) {
        self.stop_active();
    }

    pub fn is_sounding(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<&AlarmSession> {
        self.active.as_ref().map(|a| &a.session)
    }

    /// Total sessions started since construction.
    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    fn stop_active(&mut self) -> Option<AlarmSession> {
        let active = self.active.take()?;
        active.cancel.cancel();
        self.sink.stopped(&active.session);
        Some(active.session)
    }

    fn spawn_pulses(&self, session: AlarmSession, cancel: CancellationToken) {
        let sink = Arc::clone(&self.sink);
        let period = self.pulse_interval;

        tokio::spawn(async move {
            // First tick completes immediately, so the alarm is heard at once.
            let mut ticker = tokio::time::interval(period);
            let mut pulse = 0u64;
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        pulse += 1;
                        sink.pulse(&session, pulse);
                    }
                }
            }
        });
    }
}

impl Drop for AlarmController {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for AlarmController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmController")
            .field("pulse_interval", &self.pulse_interval)
            .field("session", &self.session())
            .field("sessions_started", &self.sessions_started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct CountingSink {
        notifications: AtomicU64,
        pulses: AtomicU64,
        stops: AtomicU64,
    }

    impl AlarmSink for CountingSink {
        fn notify(&self, _condition: &AlertCondition, _at: DateTime<Utc>) {
            self.notifications.fetch_add(1, Ordering::SeqCst);
        }

        fn pulse(&self, _session: &AlarmSession, _pulse: u64) {
            self.pulses.fetch_add(1, Ordering::SeqCst);
        }

        fn stopped(&self, _session: &AlarmSession) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller() -> (AlarmController, Arc<CountingSink>) {
        let sink = Arc::new(CountingSink::default());
        let controller = AlarmController::new(sink.clone(), Duration::from_millis(1000));
        (controller, sink)
    }

    const BOTH: [AlertCondition; 2] = [
        AlertCondition::HighTemperature(35.0),
        AlertCondition::AggressiveAcoustic,
    ];

    #[tokio::test(start_paused = true)]
    async fn two_conditions_start_one_session() {
        let (mut alarm, sink) = controller();

        let outcome = alarm.raise(&BOTH, true);
        match outcome {
            AlarmOutcome::Started(session) => {
                assert_eq!(session.trigger, AlertCondition::HighTemperature(35.0));
            }
            other => panic!("expected Started, got {other:?}"),
        }
        assert_eq!(alarm.raise(&BOTH, true), AlarmOutcome::AlreadySounding);
        assert_eq!(alarm.sessions_started(), 1);
        assert_eq!(sink.notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pulses_until_acknowledged() {
        let (mut alarm, sink) = controller();
        alarm.raise(&[AlertCondition::AggressiveAcoustic], true);

        tokio::time::sleep(Duration::from_millis(2010)).await;
        assert_eq!(sink.pulses.load(Ordering::SeqCst), 3);

        let closed = alarm.acknowledge().expect("session was active");
        assert_eq!(closed.trigger, AlertCondition::AggressiveAcoustic);
        assert!(!alarm.is_sounding());
        assert_eq!(sink.stops.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(sink.pulses.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn new_session_after_acknowledgement() {
        let (mut alarm, _sink) = controller();
        alarm.raise(&BOTH, true);
        alarm.acknowledge();

        assert!(matches!(alarm.raise(&BOTH, true), AlarmOutcome::Started(_)));
        assert_eq!(alarm.sessions_started(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn audio_disabled_is_visual_only() {
        let (mut alarm, sink) = controller();

        let outcome = alarm.raise(&BOTH, false);
        assert_eq!(outcome, AlarmOutcome::VisualOnly(AlertCondition::HighTemperature(35.0)));
        assert!(!alarm.is_sounding());

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(sink.pulses.load(Ordering::SeqCst), 0);
        assert_eq!(sink.notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_conditions_are_quiet() {
        let (mut alarm, sink) = controller();
        assert_eq!(alarm.raise(&[], true), AlarmOutcome::Quiet);
        assert_eq!(sink.notifications.load(Ordering::SeqCst), 0);
        assert!(alarm.acknowledge().is_none());
    }
}
