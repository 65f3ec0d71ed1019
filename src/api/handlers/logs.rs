//! Event log endpoints

use axum::extract::State;
use serde::Serialize;

use super::ApiState;
use crate::api::envelope::{ApiError, CsvDownload, Envelope};
use crate::logbook::LogEntry;

/// GET /api/v1/logs - Display list, newest first
pub async fn get_logs(State(state): State<ApiState>) -> Envelope<Vec<LogEntry>> {
    Envelope::new(state.dashboard.logs().await)
}

/// GET /api/v1/logs/export - Full history as a CSV download
pub async fn export_logs(State(state): State<ApiState>) -> Result<CsvDownload, ApiError> {
    Ok(CsvDownload(state.dashboard.export_csv().await?))
}

#[derive(Debug, Serialize)]
pub struct ClearLogsResponse {
    pub removed: usize,
}

/// DELETE /api/v1/logs - Clear display list and history
pub async fn clear_logs(State(state): State<ApiState>) -> Envelope<ClearLogsResponse> {
    let removed = state.dashboard.clear_logs().await;
    Envelope::new(ClearLogsResponse { removed })
}
