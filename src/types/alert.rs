//! Alert conditions derived from a single reading

use serde::{Deserialize, Serialize};
use std::fmt;

/// A condition raised by the alert evaluator for one tick.
///
/// Conditions are ephemeral: they are recomputed every tick and only the
/// latest set survives, as passive indicators on the live display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AlertCondition {
    /// Temperature strictly above the configured maximum (°C)
    HighTemperature(f64),
    /// Acoustic sensor classified the colony as aggressive
    AggressiveAcoustic,
}

impl AlertCondition {
    /// Operator-facing notification text.
    pub fn message(&self) -> String {
        match self {
            Self::HighTemperature(t) => format!("HIGH HEAT: {:.1}°C", t),
            Self::AggressiveAcoustic => "AGGRESSIVE SOUND DETECTED!".to_string(),
        }
    }

    /// Short event name used in the event log.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::HighTemperature(_) => "Env: High Temp",
            Self::AggressiveAcoustic => "Audio: Aggressive",
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
