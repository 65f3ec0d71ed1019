//! Control endpoints: refresh, alarm acknowledgement, settings

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiState;
use crate::alerts::AlarmSession;
use crate::api::envelope::{ApiResult, Envelope};
use crate::pipeline::TickReport;
use crate::storage::Settings;

/// POST /api/v1/refresh - Run one tick now
pub async fn post_refresh(State(state): State<ApiState>) -> Envelope<TickReport> {
    Envelope::new(state.dashboard.refresh().await)
}

#[derive(Debug, Serialize)]
pub struct AcknowledgeResponse {
    pub acknowledged: bool,
    pub session: Option<AlarmSession>,
}

/// POST /api/v1/alarm/acknowledge - Silence the active alarm
pub async fn acknowledge_alarm(State(state): State<ApiState>) -> Envelope<AcknowledgeResponse> {
    let session = state.dashboard.acknowledge_alarm().await;
    if session.is_none() {
        info!("Alarm acknowledgement received with no active session");
    }
    Envelope::new(AcknowledgeResponse {
        acknowledged: session.is_some(),
        session,
    })
}

/// Settings update body. Omitted fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsRequest {
    pub refresh_interval_ms: Option<u64>,
    pub audio_enabled: Option<bool>,
}

impl SettingsRequest {
    fn merge_into(self, current: Settings) -> Settings {
        Settings {
            refresh_interval_ms: self.refresh_interval_ms.unwrap_or(current.refresh_interval_ms),
            audio_enabled: self.audio_enabled.unwrap_or(current.audio_enabled),
        }
    }
}

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<ApiState>) -> Envelope<Settings> {
    Envelope::new(state.dashboard.settings())
}

/// POST /api/v1/settings - Validate, persist, apply, restart polling
pub async fn save_settings(
    State(state): State<ApiState>,
    Json(request): Json<SettingsRequest>,
) -> ApiResult<Settings> {
    let settings = request.merge_into(state.dashboard.settings());
    Ok(Envelope::new(state.dashboard.save_settings(settings)?))
}

/// DELETE /api/v1/settings - Clear persisted settings, back to defaults
pub async fn reset_settings(State(state): State<ApiState>) -> ApiResult<Settings> {
    Ok(Envelope::new(state.dashboard.reset_settings()?))
}
