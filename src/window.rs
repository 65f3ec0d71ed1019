//! Rolling telemetry window
//!
//! Fixed-capacity FIFO of aligned samples feeding the trend charts and the
//! detail view statistics. One [`WindowSample`] carries every channel for a
//! tick, so channels are pushed and evicted together and can never drift out
//! of alignment.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::collections::VecDeque;

use crate::types::{Metric, Reading};

/// One successful tick's worth of chartable values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub net_weight_kg: Option<f64>,
}

impl WindowSample {
    pub fn from_reading(reading: &Reading, tare_kg: f64) -> Self {
        Self {
            timestamp: reading.timestamp,
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct.map(f64::from),
            net_weight_kg: reading.net_weight_kg(tare_kg),
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature_c,
            Metric::Humidity => self.humidity_pct,
            Metric::Weight => self.net_weight_kg,
        }
    }

    /// Chart axis label (`HH:MM`, local time).
    pub fn label(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Column-oriented copy of the window, oldest first.
///
/// All four vectors have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowSnapshot {
    pub labels: Vec<String>,
    pub temperature: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub net_weight: Vec<Option<f64>>,
}

impl WindowSnapshot {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Summary statistics for one channel, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone)]
pub struct TelemetryWindow {
    samples: VecDeque<WindowSample>,
    capacity: usize,
}

impl TelemetryWindow {
    /// Create an empty window. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: WindowSample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> impl Iterator<Item = &WindowSample> {
        self.samples.iter()
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        let mut snapshot = WindowSnapshot {
            labels: Vec::with_capacity(self.samples.len()),
            temperature: Vec::with_capacity(self.samples.len()),
            humidity: Vec::with_capacity(self.samples.len()),
            net_weight: Vec::with_capacity(self.samples.len()),
        };
        for sample in &self.samples {
            snapshot.labels.push(sample.label());
            snapshot.temperature.push(sample.temperature_c);
            snapshot.humidity.push(sample.humidity_pct);
            snapshot.net_weight.push(sample.net_weight_kg);
        }
        snapshot
    }

    /// One channel's series, oldest first, including unavailable points.
    pub fn channel(&self, metric: Metric) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.value(metric)).collect()
    }

    /// Statistics over the available points of one channel.
    ///
    /// `current` is the newest available point. Returns `None` when the
    /// channel holds no available point at all.
    pub fn stats(&self, metric: Metric) -> Option<ChannelStats> {
        let values: Vec<f64> = self.samples.iter().filter_map(|s| s.value(metric)).collect();
        let current = *values.last()?;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        #[allow(clippy::cast_precision_loss)]
        let avg = values.iter().sum::<f64>() / values.len() as f64;

        Some(ChannelStats {
            current: round2(current),
            min: round2(min),
            max: round2(max),
            avg: round2(avg),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(minute: i64, temp: Option<f64>, weight: Option<f64>) -> WindowSample {
        WindowSample {
            timestamp: Utc.timestamp_opt(minute * 60, 0).unwrap(),
            temperature_c: temp,
            humidity_pct: Some(60.0),
            net_weight_kg: weight,
        }
    }

    #[test]
    fn evicts_oldest_first() {
        let mut window = TelemetryWindow::new(20);
        for i in 0..25 {
            window.push(sample(i, Some(i as f64), Some(1.0)));
        }
        assert_eq!(window.len(), 20);

        let temps = window.channel(Metric::Temperature);
        assert_eq!(temps.first(), Some(&Some(5.0)));
        assert_eq!(temps.last(), Some(&Some(24.0)));
    }

    #[test]
    fn snapshot_channels_stay_aligned() {
        let mut window = TelemetryWindow::new(3);
        window.push(sample(0, None, Some(1.0)));
        window.push(sample(1, Some(30.0), None));
        window.push(sample(2, Some(31.0), Some(2.0)));
        window.push(sample(3, None, None));

        let snapshot = window.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.temperature.len(), 3);
        assert_eq!(snapshot.humidity.len(), 3);
        assert_eq!(snapshot.net_weight.len(), 3);
        assert_eq!(snapshot.temperature, vec![Some(30.0), Some(31.0), None]);
    }

    #[test]
    fn stats_skip_unavailable_points() {
        let mut window = TelemetryWindow::new(10);
        window.push(sample(0, Some(30.0), None));
        window.push(sample(1, None, None));
        window.push(sample(2, Some(32.5), None));
        window.push(sample(3, Some(31.0), None));

        let stats = window.stats(Metric::Temperature).unwrap();
        assert_eq!(stats.current, 31.0);
        assert_eq!(stats.min, 30.0);
        assert_eq!(stats.max, 32.5);
        assert_eq!(stats.avg, 31.17);

        assert!(window.stats(Metric::Weight).is_none());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut window = TelemetryWindow::new(0);
        window.push(sample(0, Some(1.0), None));
        window.push(sample(1, Some(2.0), None));
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.channel(Metric::Temperature), vec![Some(2.0)]);
    }
}
