//! Hive Configuration - endpoint, thresholds and sizing as TOML values
//!
//! Each section implements `Default` with the values in [`super::defaults`],
//! so a missing file or a partial file behaves exactly like the built-in
//! configuration for every key it does not mention.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;
use crate::types::Thresholds;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "HIVE_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "hive_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one monitor deployment.
///
/// Load with `HiveConfig::load()` which searches:
/// 1. `$HIVE_CONFIG` env var
/// 2. `./hive_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HiveConfig {
    /// Telemetry endpoint and scale calibration
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Alert thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Chart window sizing
    #[serde(default)]
    pub window: WindowConfig,

    /// Event log sampling and display
    #[serde(default)]
    pub logbook: LogbookConfig,

    /// Alarm pacing
    #[serde(default)]
    pub alarm: AlarmConfig,

    /// Tick pipeline behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Settings database location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl HiveConfig {
    /// Load configuration using the standard search order:
    /// 1. `$HIVE_CONFIG` environment variable
    /// 2. `./hive_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), endpoint = %config.sensor.endpoint_url, "Loaded hive config from HIVE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from HIVE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "HIVE_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./hive_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(endpoint = %config.sensor.endpoint_url, "Loaded hive config from ./hive_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./hive_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No hive_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document held in memory.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Thresholds handed to the alert evaluator.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            temp_min_c: self.thresholds.temp_min_c,
            temp_max_c: self.thresholds.temp_max_c,
            humidity_min_pct: self.thresholds.humidity_min_pct,
            humidity_max_pct: self.thresholds.humidity_max_pct,
            tare_weight_kg: self.sensor.tare_weight_kg,
        }
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - Every min threshold must be strictly below its max
    /// - Timeout, pulse interval, window capacity and display cap must be > 0
    /// - Tare weight must be non-negative and finite
    /// - Sample probability must lie in [0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let t = &self.thresholds;

        Self::check_band(t.temp_min_c, t.temp_max_c, "thresholds.temp", &mut errors);
        Self::check_band(
            t.humidity_min_pct,
            t.humidity_max_pct,
            "thresholds.humidity",
            &mut errors,
        );

        if self.sensor.endpoint_url.trim().is_empty() {
            errors.push("sensor.endpoint_url must not be empty".to_string());
        }
        if self.sensor.timeout_ms == 0 {
            errors.push("sensor.timeout_ms must be > 0".to_string());
        }
        if !self.sensor.tare_weight_kg.is_finite() || self.sensor.tare_weight_kg < 0.0 {
            errors.push(format!(
                "sensor.tare_weight_kg must be a non-negative number (got {})",
                self.sensor.tare_weight_kg
            ));
        }
        if self.window.capacity == 0 {
            errors.push("window.capacity must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.logbook.sample_probability) {
            errors.push(format!(
                "logbook.sample_probability must be within [0, 1] (got {})",
                self.logbook.sample_probability
            ));
        }
        if self.logbook.display_cap == 0 {
            errors.push("logbook.display_cap must be > 0".to_string());
        }
        if self.alarm.pulse_interval_ms == 0 {
            errors.push("alarm.pulse_interval_ms must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_band(min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        if !min.is_finite() || !max.is_finite() {
            errors.push(format!("{}: bounds must be finite numbers", name));
        } else if min >= max {
            errors.push(format!(
                "{}: min ({}) must be below max ({})",
                name, min, max
            ));
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Telemetry endpoint (JSON `{temp, hum, weight, sound_status}`)
    pub endpoint_url: String,
    /// Per-request deadline (ms)
    pub timeout_ms: u64,
    /// Empty hive body weight (kg)
    pub tare_weight_kg: f64,
}

impl SensorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            endpoint_url: defaults::SENSOR_ENDPOINT_URL.to_string(),
            timeout_ms: defaults::FETCH_TIMEOUT_MS,
            tare_weight_kg: defaults::TARE_WEIGHT_KG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_min_pct: f64,
    pub humidity_max_pct: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            temp_min_c: defaults::TEMP_MIN_C,
            temp_max_c: defaults::TEMP_MAX_C,
            humidity_min_pct: defaults::HUMIDITY_MIN_PCT,
            humidity_max_pct: defaults::HUMIDITY_MAX_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Samples kept per channel
    pub capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::WINDOW_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    /// Fraction of successful ticks recorded
    pub sample_probability: f64,
    /// Entries kept in the display list
    pub display_cap: usize,
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            sample_probability: defaults::LOG_SAMPLE_PROBABILITY,
            display_cap: defaults::LOG_DISPLAY_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Interval between audible pulses (ms)
    pub pulse_interval_ms: u64,
}

impl AlarmConfig {
    pub fn pulse_interval(&self) -> Duration {
        Duration::from_millis(self.pulse_interval_ms)
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            pulse_interval_ms: defaults::ALARM_PULSE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Consecutive failed ticks before the offline run is logged as a warning
    pub offline_warn_after: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            offline_warn_after: defaults::OFFLINE_WARN_AFTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::SERVER_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the settings database
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn settings_db_path(&self) -> PathBuf {
        self.data_dir.join("settings.db")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(defaults::DATA_DIR),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
