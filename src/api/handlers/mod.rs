//! API route handlers
//!
//! Thin adapters from HTTP to [`Dashboard`] operations:
//! - live tiles, window history, stream URLs and health
//! - event log listing, CSV export and clearing
//! - manual refresh, alarm acknowledgement and settings
//! - detail view open/close

mod control;
mod detail;
mod live;
mod logs;

pub use control::*;
pub use detail::*;
pub use live::*;
pub use logs::*;

use std::sync::Arc;

use crate::pipeline::Dashboard;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub dashboard: Arc<Dashboard>,
}

impl ApiState {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self { dashboard }
    }
}
