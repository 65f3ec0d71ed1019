use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::defaults;

/// User-adjustable dashboard settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Polling period in milliseconds
    pub refresh_interval_ms: u64,
    /// Whether alarms pulse audibly (visual notice is always shown)
    pub audio_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: defaults::REFRESH_INTERVAL_MS,
            audio_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("refresh interval {got_ms} ms is below the minimum of {min_ms} ms")]
    IntervalTooShort { got_ms: u64, min_ms: u64 },
}

impl Settings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.refresh_interval_ms < defaults::MIN_REFRESH_INTERVAL_MS {
            return Err(SettingsError::IntervalTooShort {
                got_ms: self.refresh_interval_ms,
                min_ms: defaults::MIN_REFRESH_INTERVAL_MS,
            });
        }
        Ok(())
    }
}
