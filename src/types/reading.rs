//! Telemetry reading as produced by the sensor client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acoustic classification reported by the hive microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AcousticStatus {
    #[default]
    Normal,
    Aggressive,
}

impl AcousticStatus {
    /// Interpret the endpoint's `sound_status` label.
    ///
    /// Only `Aggressive` (case-insensitive) is significant; every other label,
    /// including an empty one, is treated as `Normal`.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("aggressive") {
            Self::Aggressive
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for AcousticStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized sample from the telemetry endpoint.
///
/// `None` marks a field the sensor did not deliver as a usable number.
/// Readings are immutable once built; the only place they outlive a tick is
/// the telemetry window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Hive temperature, rounded to 0.1 °C
    pub temperature_c: Option<f64>,
    /// Relative humidity, whole percent
    pub humidity_pct: Option<u8>,
    /// Scale reading before tare subtraction
    pub raw_weight_kg: Option<f64>,
    /// Acoustic classification
    pub acoustic: AcousticStatus,
    /// When the reading was received
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Net hive weight for the given tare, if the scale delivered a value.
    pub fn net_weight_kg(&self, tare_kg: f64) -> Option<f64> {
        self.raw_weight_kg.map(|raw| net_weight(raw, tare_kg))
    }
}

/// Raw scale weight minus tare, clamped at zero.
pub fn net_weight(raw_kg: f64, tare_kg: f64) -> f64 {
    (raw_kg - tare_kg).max(0.0)
}
