//! Sampled event log
//!
//! Successful ticks are occasionally summarized into a [`LogEntry`]. A short
//! display list feeds the dashboard table; the full history is kept for CSV
//! export.

mod export;
mod recorder;
mod sampler;

pub use export::{export_filename, ExportError, CSV_HEADER};
pub use recorder::{LogEntry, LogRecorder, LogSeverity, FORAGING_EVENT};
pub use sampler::{AlwaysSample, EveryNthSampler, NeverSample, RandomSampler, Sampler};
