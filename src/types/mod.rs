//! Shared data structures for hive telemetry
//!
//! This module defines the core types flowing through the polling pipeline:
//! - Reading: one normalized sample from the sensor endpoint
//! - Thresholds: alert limits and tare weight
//! - AlertCondition: per-tick alert results
//! - Metric: the chartable channels of the telemetry window

mod reading;
mod alert;
mod metric;
pub mod thresholds;
pub mod format;

pub use reading::*;
pub use alert::*;
pub use metric::*;
pub use thresholds::Thresholds;
