//! Telemetry endpoint client
//!
//! Performs one bounded GET against the sensor endpoint per tick and turns
//! the outcome into a [`Reading`] or a [`FetchError`]. Every failure mode
//! (timeout, transport, HTTP status, malformed body) is returned as a value;
//! nothing escapes this boundary as a panic.

use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use thiserror::Error;

use super::payload;
use crate::config::SensorConfig;
use crate::types::Reading;

/// Header the sensor's tunnel requires to skip its browser interstitial.
const TUNNEL_SKIP_HEADER: &str = "ngrok-skip-browser-warning";

/// Telemetry fetch errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Timed out after {0:?} waiting for sensor")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Sensor returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    /// Short machine-friendly reason used in tick reports.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Network(_) => "network",
            FetchError::HttpStatus(_) => "http_status",
            FetchError::MalformedPayload(_) => "malformed_payload",
            FetchError::ClientBuild(_) => "client_build",
        }
    }
}

/// Where readings come from.
///
/// [`SensorClient`] is the production implementation; the pipeline only
/// depends on this trait so scripted sources can drive it in tests.
#[async_trait]
pub trait TelemetrySource: Send + Sync + 'static {
    /// Perform one fetch. Implementations must bound their own duration.
    async fn fetch_reading(&self) -> Result<Reading, FetchError>;

    /// Human-readable name for logging.
    fn source_name(&self) -> &str;
}

/// HTTP client for the hive telemetry endpoint.
#[derive(Clone)]
pub struct SensorClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl SensorClient {
    /// Create a client for `endpoint` with a per-request deadline.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &SensorConfig) -> Result<Self, FetchError> {
        Self::new(&config.endpoint_url, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and parse one reading.
    ///
    /// The deadline covers connect, headers and body; exceeding it is
    /// reported as [`FetchError::Timeout`].
    pub async fn fetch_reading(&self) -> Result<Reading, FetchError> {
        let body = tokio::time::timeout(self.timeout, self.fetch_body())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        let reading = payload::parse_reading(&body, Utc::now())?;

        if reading.temperature_c.is_none()
            || reading.humidity_pct.is_none()
            || reading.raw_weight_kg.is_none()
        {
            tracing::debug!(
                temperature = ?reading.temperature_c,
                humidity = ?reading.humidity_pct,
                weight = ?reading.raw_weight_kg,
                "Sensor payload contained unavailable fields"
            );
        }

        Ok(reading)
    }

    async fn fetch_body(&self) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header(TUNNEL_SKIP_HEADER, "true")
            .send()
            .await
            .map_err(|e| classify(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify(&e, self.timeout))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TelemetrySource for SensorClient {
    async fn fetch_reading(&self) -> Result<Reading, FetchError> {
        SensorClient::fetch_reading(self).await
    }

    fn source_name(&self) -> &str {
        &self.endpoint
    }
}

fn classify(err: &reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Network(err.to_string())
    }
}
