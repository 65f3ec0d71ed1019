//! Config Validation Tests
//!
//! Exercises TOML loading and range validation of `HiveConfig`
//! independently from the rest of the pipeline.

use std::io::Write;

use hive_monitor::config::{defaults, ConfigError, HiveConfig};

fn validation_errors(config: &HiveConfig) -> Vec<String> {
    match config.validate() {
        Err(ConfigError::Validation(errors)) => errors,
        Err(other) => panic!("expected validation errors, got {other}"),
        Ok(()) => Vec::new(),
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let toml_str = r#"
[sensor]
endpoint_url = "https://hive-7.ngrok.app/data"

[thresholds]
temp_max_c = 35.5
"#;
    let config = HiveConfig::from_toml_str(toml_str).unwrap();

    assert_eq!(config.sensor.endpoint_url, "https://hive-7.ngrok.app/data");
    assert_eq!(config.sensor.timeout_ms, defaults::FETCH_TIMEOUT_MS);
    assert_eq!(config.thresholds.temp_max_c, 35.5);
    assert_eq!(config.thresholds.temp_min_c, defaults::TEMP_MIN_C);
    assert_eq!(config.window.capacity, defaults::WINDOW_CAPACITY);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_file_is_the_default_config() {
    let config = HiveConfig::from_toml_str("").unwrap();
    assert_eq!(config, HiveConfig::default());
}

#[test]
fn load_from_file_reads_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[window]\ncapacity = 30\n\n[logbook]\ndisplay_cap = 12").unwrap();

    let config = HiveConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.window.capacity, 30);
    assert_eq!(config.logbook.display_cap, 12);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HiveConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_, _)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[sensor\nendpoint_url = ").unwrap();

    let err = HiveConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_, _)));
    assert!(err.to_string().contains("Config parse error"));
}

// ============================================================================
// Range validation
// ============================================================================

#[test]
fn inverted_temperature_band_is_rejected() {
    let mut config = HiveConfig::default();
    config.thresholds.temp_min_c = 34.0;
    config.thresholds.temp_max_c = 33.0;

    let errors = validation_errors(&config);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("thresholds.temp"));
}

#[test]
fn zero_sizes_are_rejected_together() {
    let mut config = HiveConfig::default();
    config.window.capacity = 0;
    config.logbook.display_cap = 0;
    config.alarm.pulse_interval_ms = 0;
    config.sensor.timeout_ms = 0;

    let errors = validation_errors(&config);
    assert_eq!(errors.len(), 4, "got {errors:?}");
}

#[test]
fn sample_probability_outside_unit_interval_is_rejected() {
    let mut config = HiveConfig::default();
    config.logbook.sample_probability = 1.5;
    let errors = validation_errors(&config);
    assert!(errors[0].contains("sample_probability"));

    config.logbook.sample_probability = 1.0;
    assert!(config.validate().is_ok());
}

#[test]
fn negative_tare_is_rejected() {
    let mut config = HiveConfig::default();
    config.sensor.tare_weight_kg = -0.5;
    assert!(validation_errors(&config)[0].contains("tare_weight_kg"));
}

#[test]
fn blank_endpoint_is_rejected() {
    let mut config = HiveConfig::default();
    config.sensor.endpoint_url = "   ".to_string();
    assert!(validation_errors(&config)[0].contains("endpoint_url"));
}
