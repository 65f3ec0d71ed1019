//! Alert rules for a single reading

use crate::types::{AcousticStatus, AlertCondition, Reading, Thresholds};

/// Evaluate a reading against thresholds.
///
/// Pure and total. Conditions come back in a fixed order: high temperature
/// first, then aggressive acoustics. The first entry is the one allowed to
/// start the alarm; any others are passive indicators.
pub fn evaluate(reading: &Reading, thresholds: &Thresholds) -> Vec<AlertCondition> {
    let mut conditions = Vec::with_capacity(2);

    if let Some(temp) = reading.temperature_c {
        if temp > thresholds.temp_max_c {
            conditions.push(AlertCondition::HighTemperature(temp));
        }
    }

    if reading.acoustic == AcousticStatus::Aggressive {
        conditions.push(AlertCondition::AggressiveAcoustic);
    }

    conditions
}
