//! CSV export of the log history

use chrono::{DateTime, Local, TimeZone};
use std::collections::VecDeque;
use thiserror::Error;

use super::{LogEntry, LogRecorder};

pub const CSV_HEADER: [&str; 4] = ["Timestamp", "Event", "Value", "Status"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no log entries to export")]
    NoEntries,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("CSV writer could not be flushed: {0}")]
    Flush(String),
}

impl LogRecorder {
    /// Serialize the full history, newest first, with every field quoted.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        write_csv(self.history())
    }
}

fn write_csv(entries: &VecDeque<LogEntry>) -> Result<String, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::NoEntries);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for entry in entries {
        let timestamp = entry
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        writer.write_record([
            timestamp.as_str(),
            entry.event.as_str(),
            entry.value_summary.as_str(),
            entry.severity.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for an export made at `at`: `hive_data_YYYY-MM-DD.csv`.
pub fn export_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("hive_data_{}.csv", at.format("%Y-%m-%d"))
}
