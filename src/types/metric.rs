//! Chartable telemetry channels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric channel of the telemetry window that can be opened in the
/// detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Humidity,
    Weight,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::Weight];

    /// Detail view title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature Trend",
            Self::Humidity => "Humidity Trend",
            Self::Weight => "Weight Trend",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Weight => "kg",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Weight => "weight",
        };
        f.write_str(name)
    }
}

/// Error returned when a metric name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric '{0}' (expected temperature, humidity or weight)")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(Self::Temperature),
            "humidity" | "hum" => Ok(Self::Humidity),
            "weight" => Ok(Self::Weight),
            other => Err(UnknownMetric(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("temp".parse::<Metric>(), Ok(Metric::Temperature));
        assert_eq!("Humidity".parse::<Metric>(), Ok(Metric::Humidity));
        assert_eq!("weight".parse::<Metric>(), Ok(Metric::Weight));
        assert!("pressure".parse::<Metric>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for metric in Metric::ALL {
            assert_eq!(metric.to_string().parse::<Metric>(), Ok(metric));
        }
    }
}
