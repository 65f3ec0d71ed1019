//! Alert evaluation and the audible alarm
//!
//! `evaluator` turns one reading into alert conditions. `alarm` owns the
//! single alarm session those conditions may start.

mod alarm;
mod evaluator;

pub use alarm::{AlarmController, AlarmOutcome, AlarmSession, AlarmSink, TracingAlarmSink, PULSE_TONE_HZ};
pub use evaluator::evaluate;
