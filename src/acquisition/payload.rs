//! Telemetry payload parsing
//!
//! The endpoint answers `{temp, hum, weight, sound_status?}`. Numbers may
//! arrive as JSON numbers or numeric strings. A field that cannot be coerced
//! becomes `None`; it is never replaced by a plausible default.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::FetchError;
use crate::types::{AcousticStatus, Reading};

/// Parse a response body into a [`Reading`] stamped with `received_at`.
///
/// Fails only when the body is not a JSON object; individual fields degrade
/// to unavailable instead.
pub fn parse_reading(body: &[u8], received_at: DateTime<Utc>) -> Result<Reading, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    let fields = value
        .as_object()
        .ok_or_else(|| FetchError::MalformedPayload("expected a JSON object".to_string()))?;

    Ok(reading_from_fields(fields, received_at))
}

fn reading_from_fields(fields: &Map<String, Value>, received_at: DateTime<Utc>) -> Reading {
    let acoustic = fields
        .get("sound_status")
        .and_then(Value::as_str)
        .map(AcousticStatus::from_label)
        .unwrap_or_default();

    Reading {
        temperature_c: coerce_number(fields.get("temp")).map(round_to_tenth),
        humidity_pct: coerce_number(fields.get("hum")).and_then(whole_percent),
        raw_weight_kg: coerce_number(fields.get("weight")),
        acoustic,
        timestamp: received_at,
    }
}

/// Coerce a JSON number or numeric string to a finite `f64`.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to a whole percent; values outside 0..=100 are not humidity.
fn whole_percent(value: f64) -> Option<u8> {
    let rounded = value.round();
    if (0.0..=100.0).contains(&rounded) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(rounded as u8)
    } else {
        None
    }
}
