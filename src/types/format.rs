//! Display formatting for live tiles and log summaries
//!
//! Unavailable values always render as [`UNAVAILABLE`] so an outage is
//! visible instead of being hidden behind a stale or zero value.

/// Sentinel shown in place of a value the sensor did not deliver.
pub const UNAVAILABLE: &str = "--";

pub fn temperature(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{:.1}°C", t),
        None => format!("{}°C", UNAVAILABLE),
    }
}

pub fn humidity(value: Option<u8>) -> String {
    match value {
        Some(h) => format!("{}%", h),
        None => format!("{}%", UNAVAILABLE),
    }
}

/// Net weight with two decimals, e.g. `3.30 kg`.
pub fn weight(value: Option<f64>) -> String {
    format!("{} kg", weight_value(value))
}

/// Net weight number only (`3.30` or `--`).
pub fn weight_value(value: Option<f64>) -> String {
    match value {
        Some(w) => format!("{:.2}", w),
        None => UNAVAILABLE.to_string(),
    }
}
