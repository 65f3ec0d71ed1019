//! Detail view endpoints

use axum::extract::{Path, State};
use serde::Serialize;

use super::ApiState;
use crate::api::envelope::{ApiError, ApiResult, Envelope};
use crate::pipeline::DetailView;
use crate::types::Metric;

/// GET /api/v1/detail/:metric - Open (or refresh) the detail view
pub async fn open_detail(
    State(state): State<ApiState>,
    Path(metric): Path<String>,
) -> ApiResult<DetailView> {
    let metric = metric
        .parse::<Metric>()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Envelope::new(state.dashboard.open_detail(metric).await))
}

/// GET /api/v1/detail - The open detail view, if any
pub async fn get_detail(State(state): State<ApiState>) -> ApiResult<DetailView> {
    state
        .dashboard
        .detail()
        .await
        .map(Envelope::new)
        .ok_or_else(|| ApiError::not_found("no detail view is open"))
}

#[derive(Debug, Serialize)]
pub struct CloseDetailResponse {
    pub closed: bool,
}

/// DELETE /api/v1/detail - Close the detail view; the window is kept
pub async fn close_detail(State(state): State<ApiState>) -> Envelope<CloseDetailResponse> {
    let closed = state.dashboard.close_detail().await;
    Envelope::new(CloseDetailResponse { closed })
}
