//! Alert thresholds and scale calibration

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Limits the alert evaluator compares readings against, plus the tare
/// weight used to derive net hive weight. The tick pipeline reads the tare
/// from here and nowhere else.
///
/// Loaded from configuration at startup and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Lower comfort bound for brood temperature (°C)
    pub temp_min_c: f64,
    /// High-heat alert fires strictly above this (°C)
    pub temp_max_c: f64,
    /// Lower humidity comfort bound (%)
    pub humidity_min_pct: f64,
    /// Upper humidity comfort bound (%)
    pub humidity_max_pct: f64,
    /// Empty hive body weight subtracted from the scale reading (kg)
    pub tare_weight_kg: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_min_c: defaults::TEMP_MIN_C,
            temp_max_c: defaults::TEMP_MAX_C,
            humidity_min_pct: defaults::HUMIDITY_MIN_PCT,
            humidity_max_pct: defaults::HUMIDITY_MAX_PCT,
            tare_weight_kg: defaults::TARE_WEIGHT_KG,
        }
    }
}
