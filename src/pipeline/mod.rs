//! Telemetry pipeline
//!
//! ```text
//! timer / manual / startup
//!        │  issue gate ticket (invocation order)
//!        ▼
//! fetch (timeout-bounded, no locks held)
//!        │  wait for turn
//!        ▼
//! apply: net weight → live display → alerts/alarm → window + detail → log
//! ```
//!
//! A failed fetch applies as an offline tick: sentinels on the display,
//! nothing else changes. No failure stops the timer.

mod dashboard;
mod gate;
mod scheduler;
mod state;
mod tick;

pub use dashboard::{CsvExport, Dashboard, DashboardError, HealthReport, LiveView};
pub use gate::{GateTicket, SequenceGate};
pub use scheduler::PollingScheduler;
pub use state::*;
pub use tick::TickPipeline;
