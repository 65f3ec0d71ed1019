//! Sensor data acquisition module
//!
//! Handles data ingestion from the hive's HTTP telemetry endpoint and the
//! derivation of the companion video/audio stream URLs.

pub mod client;
pub mod payload;
pub mod streams;

pub use client::{FetchError, SensorClient, TelemetrySource};
pub use streams::{StreamEndpoints, StreamUrlError};
