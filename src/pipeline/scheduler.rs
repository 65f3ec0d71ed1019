//! Polling scheduler
//!
//! Owns the single repeating timer. `start` always cancels the previous
//! timer before arming a new one, so a restart can never leave two pollers
//! running. Each timer fire spawns its tick as a separate task so a slow
//! fetch never delays the next fire.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use super::state::{TickOrigin, TickReport};
use super::tick::TickPipeline;

struct ActiveTimer {
    period: Duration,
    cancel: CancellationToken,
}

#[derive(Clone)]
pub struct PollingScheduler {
    pipeline: Arc<TickPipeline>,
    timer: Arc<Mutex<Option<ActiveTimer>>>,
    tasks: TaskTracker,
    shutdown: CancellationToken,
}

impl PollingScheduler {
    pub fn new(pipeline: Arc<TickPipeline>, shutdown: CancellationToken) -> Self {
        Self {
            pipeline,
            timer: Arc::new(Mutex::new(None)),
            tasks: TaskTracker::new(),
            shutdown,
        }
    }

    /// Arm the timer with `period`, replacing any running timer.
    ///
    /// The first timer tick fires one full period after the call.
    pub fn start(&self, period: Duration) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        self.arm(&mut timer, period);
    }

    /// Re-arm with `period` only if a timer is running.
    ///
    /// The check and the re-arm happen under one lock, so a concurrent
    /// `stop` either wins and polling stays off, or loses and stops the new
    /// timer. Returns whether a timer was re-armed.
    pub fn restart_if_running(&self, period: Duration) -> bool {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.is_none() {
            return false;
        }
        self.arm(&mut timer, period);
        true
    }

    fn arm(&self, slot: &mut Option<ActiveTimer>, period: Duration) {
        if let Some(previous) = slot.take() {
            previous.cancel.cancel();
            info!(
                old_ms = previous.period.as_millis() as u64,
                new_ms = period.as_millis() as u64,
                "Polling timer restarted"
            );
        } else {
            info!(
                period_ms = period.as_millis() as u64,
                source = self.pipeline.source_name(),
                "Polling timer started"
            );
        }

        let cancel = self.shutdown.child_token();
        let pipeline = Arc::clone(&self.pipeline);
        let tasks = self.tasks.clone();
        let timer_cancel = cancel.clone();
        let run_epoch = self.pipeline.epoch();

        self.tasks.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = timer_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let ticket = pipeline.issue_ticket();
                        let pipeline = Arc::clone(&pipeline);
                        tasks.spawn(async move {
                            pipeline.run(ticket, TickOrigin::Timer, run_epoch).await;
                        });
                    }
                }
            }
        });

        *slot = Some(ActiveTimer { period, cancel });
    }

    /// Cancel the timer and silence any sounding alarm.
    ///
    /// Ticks already in flight still complete and update the display, but
    /// none of them can start a new alarm session. Returns whether a timer
    /// was running.
    pub async fn stop(&self) -> bool {
        let previous = {
            let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
            self.pipeline.advance_epoch();
            timer.take()
        };

        let was_running = previous.is_some();
        if let Some(timer) = previous {
            timer.cancel.cancel();
            info!("Polling timer stopped");
        }

        self.pipeline.state().write().await.alarm.silence();
        was_running
    }

    /// Run a tick now, outside the timer schedule, and wait for it.
    pub async fn tick(&self, origin: TickOrigin) -> TickReport {
        let epoch = self.pipeline.epoch();
        let ticket = self.pipeline.issue_ticket();
        self.pipeline.run(ticket, origin, epoch).await
    }

    /// Run a tick now in the background.
    pub fn spawn_tick(&self, origin: TickOrigin) {
        let epoch = self.pipeline.epoch();
        let ticket = self.pipeline.issue_ticket();
        let pipeline = Arc::clone(&self.pipeline);
        self.tasks.spawn(async move {
            pipeline.run(ticket, origin, epoch).await;
        });
    }

    pub fn is_running(&self) -> bool {
        self.period().is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.period)
    }

    /// Wait for the timer task and every in-flight tick to finish.
    ///
    /// Call after `stop`, otherwise the timer task never finishes.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}
