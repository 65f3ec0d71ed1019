//! Monitor Configuration Module
//!
//! Provides the deployment configuration loaded from a TOML file: sensor
//! endpoint, alert thresholds, window and log sizing, alarm pacing and the
//! HTTP bind address.
//!
//! ## Loading Order
//!
//! 1. `HIVE_CONFIG` environment variable (path to TOML file)
//! 2. `hive_config.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ## Usage
//!
//! ```ignore
//! let config = Arc::new(HiveConfig::load());
//! let dashboard = Dashboard::init(config, source, store)?;
//! ```
//!
//! The configuration is immutable after startup and handed to components by
//! `Arc`. Runtime-tunable values (refresh interval, audio) live in
//! [`crate::storage::Settings`] instead.

mod hive_config;
pub mod defaults;

pub use hive_config::*;
