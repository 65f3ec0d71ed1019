use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

use super::Sampler;
use crate::types::{format, AlertCondition, Reading};

/// Event name for a tick with no alert condition.
pub const FORAGING_EVENT: &str = "Traffic: Foraging";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogSeverity {
    Normal,
    Warning,
}

impl LogSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
    /// `"<temp>°C | <net weight>kg"`
    pub value_summary: String,
    pub severity: LogSeverity,
}

impl LogEntry {
    /// Build the entry for a reading.
    ///
    /// The event names the first alert condition (evaluator order puts
    /// high temperature ahead of acoustics) or foraging traffic when none
    /// fired.
    pub fn describe(reading: &Reading, net_weight_kg: Option<f64>, conditions: &[AlertCondition]) -> Self {
        let (event, severity) = match conditions.first() {
            Some(condition) => (condition.event_name(), LogSeverity::Warning),
            None => (FORAGING_EVENT, LogSeverity::Normal),
        };

        let temperature = reading
            .temperature_c
            .map_or_else(|| format::UNAVAILABLE.to_string(), |t| format!("{:.1}", t));

        Self {
            timestamp: reading.timestamp,
            event: event.to_string(),
            value_summary: format!("{}°C | {}kg", temperature, format::weight_value(net_weight_kg)),
            severity,
        }
    }
}

pub struct LogRecorder {
    sampler: Box<dyn Sampler>,
    display: VecDeque<LogEntry>,
    display_cap: usize,
    /// Newest first
    history: VecDeque<LogEntry>,
}

impl LogRecorder {
    pub fn new(sampler: Box<dyn Sampler>, display_cap: usize) -> Self {
        let display_cap = display_cap.max(1);
        Self {
            sampler,
            display: VecDeque::with_capacity(display_cap),
            display_cap,
            history: VecDeque::new(),
        }
    }

    /// Possibly record an entry for a successful tick.
    ///
    /// Failed ticks have no reading and therefore can never be logged.
    pub fn maybe_record(
        &mut self,
        reading: &Reading,
        net_weight_kg: Option<f64>,
        conditions: &[AlertCondition],
    ) -> Option<LogEntry> {
        if !self.sampler.should_record() {
            return None;
        }

        let entry = LogEntry::describe(reading, net_weight_kg, conditions);
        self.record(entry.clone());
        Some(entry)
    }

    fn record(&mut self, entry: LogEntry) {
        self.display.push_front(entry.clone());
        self.display.truncate(self.display_cap);
        self.history.push_front(entry);
    }

    /// The capped display list, newest first.
    pub fn display(&self) -> impl Iterator<Item = &LogEntry> {
        self.display.iter()
    }

    /// Every recorded entry, newest first.
    pub fn history(&self) -> &VecDeque<LogEntry> {
        &self.history
    }

    pub fn display_cap(&self) -> usize {
        self.display_cap
    }

    pub fn sampler_name(&self) -> String {
        self.sampler.describe()
    }

    /// Drop the display list and history. Returns how many entries were
    /// removed from history.
    pub fn clear(&mut self) -> usize {
        let removed = self.history.len();
        self.display.clear();
        self.history.clear();
        removed
    }
}

impl fmt::Debug for LogRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRecorder")
            .field("sampler", &self.sampler.describe())
            .field("display", &self.display.len())
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logbook::{AlwaysSample, EveryNthSampler, NeverSample};
    use crate::types::AcousticStatus;

    fn reading(temp: Option<f64>) -> Reading {
        Reading {
            temperature_c: temp,
            humidity_pct: Some(60),
            raw_weight_kg: Some(5.3),
            acoustic: AcousticStatus::Normal,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn foraging_when_quiet() {
        let mut log = LogRecorder::new(Box::new(AlwaysSample), 8);
        let entry = log.maybe_record(&reading(Some(30.0)), Some(3.3), &[]).unwrap();
        assert_eq!(entry.event, FORAGING_EVENT);
        assert_eq!(entry.severity, LogSeverity::Normal);
        assert_eq!(entry.value_summary, "30.0°C | 3.30kg");
    }

    #[test]
    fn high_temperature_takes_precedence() {
        let mut log = LogRecorder::new(Box::new(AlwaysSample), 8);
        let conditions = [
            AlertCondition::HighTemperature(35.0),
            AlertCondition::AggressiveAcoustic,
        ];
        let entry = log.maybe_record(&reading(Some(35.0)), Some(3.3), &conditions).unwrap();
        assert_eq!(entry.event, "Env: High Temp");
        assert_eq!(entry.severity, LogSeverity::Warning);
    }

    #[test]
    fn aggressive_alone_is_a_warning() {
        let mut log = LogRecorder::new(Box::new(AlwaysSample), 8);
        let entry = log
            .maybe_record(&reading(None), None, &[AlertCondition::AggressiveAcoustic])
            .unwrap();
        assert_eq!(entry.event, "Audio: Aggressive");
        assert_eq!(entry.severity, LogSeverity::Warning);
        assert_eq!(entry.value_summary, "--°C | --kg");
    }

    #[test]
    fn display_is_capped_history_is_not() {
        let mut log = LogRecorder::new(Box::new(AlwaysSample), 8);
        for i in 0..12 {
            log.maybe_record(&reading(Some(f64::from(i))), Some(1.0), &[]);
        }
        assert_eq!(log.display().count(), 8);
        assert_eq!(log.history().len(), 12);
        assert_eq!(log.history()[0].value_summary, "11.0°C | 1.00kg");
        assert_eq!(log.display().next().unwrap().value_summary, "11.0°C | 1.00kg");
    }

    #[test]
    fn long_history_stays_newest_first() {
        let mut log = LogRecorder::new(Box::new(AlwaysSample), 8);
        for i in 0..5_000 {
            log.maybe_record(&reading(Some(f64::from(i) / 100.0)), None, &[]);
        }
        assert_eq!(log.history().len(), 5_000);
        assert_eq!(log.history()[0].value_summary, "50.0°C | --kg");
        assert_eq!(log.history().back().unwrap().value_summary, "0.0°C | --kg");
    }

    #[test]
    fn sampler_gates_recording() {
        let mut never = LogRecorder::new(Box::new(NeverSample), 8);
        assert!(never.maybe_record(&reading(Some(30.0)), None, &[]).is_none());
        assert!(never.history().is_empty());

        let mut every_other = LogRecorder::new(Box::new(EveryNthSampler::new(2)), 8);
        let recorded = (0..10)
            .filter_map(|_| every_other.maybe_record(&reading(Some(30.0)), None, &[]))
            .count();
        assert_eq!(recorded, 5);
    }

    #[test]
    fn clear_empties_both_lists() {
        let mut log = LogRecorder::new(Box::new(AlwaysSample), 8);
        log.maybe_record(&reading(Some(30.0)), None, &[]);
        assert_eq!(log.clear(), 1);
        assert_eq!(log.display().count(), 0);
        assert!(log.history().is_empty());
    }
}
