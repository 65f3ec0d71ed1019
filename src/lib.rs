//! Hive Monitor: beehive telemetry dashboard core
//!
//! Polls a single hive sensor endpoint, keeps a rolling window of readings,
//! raises alerts and an audible alarm, and keeps a sampled event log.
//!
//! ## Architecture
//!
//! - **Acquisition**: bounded-timeout HTTP fetch and payload normalization
//! - **Window**: fixed-capacity aligned time series for charts and stats
//! - **Alerts**: pure threshold evaluation plus the single-session alarm
//! - **Logbook**: sampled event log with CSV export
//! - **Pipeline**: tick pipeline, polling scheduler and the `Dashboard` facade
//! - **API**: axum presentation surface over the dashboard

pub mod acquisition;
pub mod alerts;
pub mod api;
pub mod config;
pub mod logbook;
pub mod pipeline;
pub mod storage;
pub mod types;
pub mod window;

// Re-export configuration
pub use config::HiveConfig;

// Re-export commonly used types
pub use types::{AcousticStatus, AlertCondition, Metric, Reading, Thresholds};

// Re-export the sensor boundary
pub use acquisition::{FetchError, SensorClient, StreamEndpoints, TelemetrySource};

// Re-export the dashboard
pub use pipeline::{Dashboard, DashboardError, TickOrigin, TickReport};

// Re-export storage
pub use storage::{InMemorySettingsStore, Settings, SettingsStore, SledSettingsStore, StorageError};
