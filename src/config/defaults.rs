//! System-wide default constants.
//!
//! Centralises the numbers the monitor falls back to when no config file is
//! present. Grouped by subsystem for easy discovery.

// ============================================================================
// Sensor
// ============================================================================

/// Telemetry endpoint polled when none is configured.
pub const SENSOR_ENDPOINT_URL: &str = "http://127.0.0.1:5000/data";

/// Hard deadline for one telemetry request (ms).
pub const FETCH_TIMEOUT_MS: u64 = 1_500;

/// Empty hive body weight subtracted from the raw scale reading (kg).
pub const TARE_WEIGHT_KG: f64 = 2.0;

// ============================================================================
// Thresholds
// ============================================================================

/// Brood temperature comfort band (°C).
pub const TEMP_MIN_C: f64 = 28.0;
pub const TEMP_MAX_C: f64 = 33.0;

/// Humidity comfort band (%).
pub const HUMIDITY_MIN_PCT: f64 = 55.0;
pub const HUMIDITY_MAX_PCT: f64 = 65.0;

// ============================================================================
// Window / Log
// ============================================================================

/// Samples kept per chart channel.
pub const WINDOW_CAPACITY: usize = 20;

/// Entries shown in the event log table.
pub const LOG_DISPLAY_CAP: usize = 8;

/// Fraction of successful ticks that produce a log entry.
pub const LOG_SAMPLE_PROBABILITY: f64 = 0.2;

// ============================================================================
// Alarm
// ============================================================================

/// Interval between audible alarm pulses (ms).
pub const ALARM_PULSE_INTERVAL_MS: u64 = 1_000;

// ============================================================================
// Scheduler / Settings
// ============================================================================

/// Default polling interval (ms).
pub const REFRESH_INTERVAL_MS: u64 = 2_000;

/// Smallest polling interval accepted from the settings surface (ms).
pub const MIN_REFRESH_INTERVAL_MS: u64 = 250;

/// Consecutive failed ticks after which the offline run is logged as a warning.
pub const OFFLINE_WARN_AFTER: u32 = 5;

// ============================================================================
// Server / Storage
// ============================================================================

/// HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Directory holding the settings database.
pub const DATA_DIR: &str = "./data";
