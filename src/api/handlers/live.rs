//! Read-only views: live tiles, history, streams, health

use axum::extract::State;

use super::ApiState;
use crate::acquisition::StreamEndpoints;
use crate::api::envelope::{ApiResult, Envelope};
use crate::pipeline::{HealthReport, LiveView};
use crate::window::WindowSnapshot;

/// GET /api/v1/live - Current tiles, raw values and alarm status
pub async fn get_live(State(state): State<ApiState>) -> Envelope<LiveView> {
    Envelope::new(state.dashboard.live().await)
}

/// GET /api/v1/history - Rolling window, oldest first
pub async fn get_history(State(state): State<ApiState>) -> Envelope<WindowSnapshot> {
    Envelope::new(state.dashboard.history().await)
}

/// GET /api/v1/streams - Video and audio feed URLs
pub async fn get_streams(State(state): State<ApiState>) -> ApiResult<StreamEndpoints> {
    Ok(Envelope::new(state.dashboard.streams()?))
}

/// GET /api/v1/health - Polling status and tick counters
pub async fn get_health(State(state): State<ApiState>) -> Envelope<HealthReport> {
    Envelope::new(state.dashboard.health().await)
}
