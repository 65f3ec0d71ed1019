//! API route definitions
//!
//! Organizes endpoints for the hive dashboard:
//! - /api/v1/live, /history, /streams, /health - read-only views
//! - /api/v1/logs, /logs/export - event log and CSV download
//! - /api/v1/refresh, /alarm/acknowledge, /settings - control
//! - /api/v1/detail - per-metric detail view

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, ApiState};

/// Create all API routes for the dashboard
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/live", get(handlers::get_live))
        .route("/history", get(handlers::get_history))
        .route("/streams", get(handlers::get_streams))
        .route("/health", get(handlers::get_health))
        // Event log
        .route("/logs", get(handlers::get_logs).delete(handlers::clear_logs))
        .route("/logs/export", get(handlers::export_logs))
        // Control
        .route("/refresh", post(handlers::post_refresh))
        .route("/alarm/acknowledge", post(handlers::acknowledge_alarm))
        .route(
            "/settings",
            get(handlers::get_settings)
                .post(handlers::save_settings)
                .delete(handlers::reset_settings),
        )
        // Detail view
        .route("/detail", get(handlers::get_detail).delete(handlers::close_detail))
        .route("/detail/:metric", get(handlers::open_detail))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::{FetchError, TelemetrySource};
    use crate::alerts::TracingAlarmSink;
    use crate::config::HiveConfig;
    use crate::logbook::AlwaysSample;
    use crate::pipeline::Dashboard;
    use crate::storage::InMemorySettingsStore;
    use crate::types::{AcousticStatus, Reading};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct HotHive;

    #[async_trait]
    impl TelemetrySource for HotHive {
        async fn fetch_reading(&self) -> Result<Reading, FetchError> {
            Ok(Reading {
                temperature_c: Some(34.2),
                humidity_pct: Some(60),
                raw_weight_kg: Some(5.3),
                acoustic: AcousticStatus::Normal,
                timestamp: chrono::Utc::now(),
            })
        }

        fn source_name(&self) -> &str {
            "hot-hive"
        }
    }

    fn create_test_state() -> ApiState {
        let dashboard = Dashboard::init_with(
            Arc::new(HiveConfig::default()),
            Arc::new(HotHive),
            Arc::new(InMemorySettingsStore::new()),
            Box::new(AlwaysSample),
            Arc::new(TracingAlarmSink),
        )
        .unwrap();
        ApiState::new(Arc::new(dashboard))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn live_before_first_tick_shows_sentinels() {
        let app = api_routes(create_test_state());
        let response = app.oneshot(request("GET", "/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["tiles"]["temperature"], "--°C");
        assert_eq!(json["data"]["display"]["online"], false);
    }

    #[tokio::test]
    async fn refresh_then_live_reflects_reading() {
        let state = create_test_state();

        let response = api_routes(state.clone())
            .oneshot(request("POST", "/refresh"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["data"]["online"], true);
        assert_eq!(report["data"]["origin"], "manual");
        assert_eq!(report["data"]["alarm_started"], true);

        let live = body_json(api_routes(state.clone()).oneshot(request("GET", "/live")).await.unwrap()).await;
        assert_eq!(live["data"]["tiles"]["temperature"], "34.2°C");
        assert_eq!(live["data"]["tiles"]["weight"], "3.30 kg");
        assert_eq!(live["data"]["alarm"]["sounding"], true);

        let ack = body_json(
            api_routes(state)
                .oneshot(request("POST", "/alarm/acknowledge"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(ack["data"]["acknowledged"], true);
    }

    #[tokio::test]
    async fn export_is_not_found_until_something_is_logged() {
        let state = create_test_state();

        let response = api_routes(state.clone())
            .oneshot(request("GET", "/logs/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        api_routes(state.clone()).oneshot(request("POST", "/refresh")).await.unwrap();
        state.dashboard.acknowledge_alarm().await;

        let response = api_routes(state)
            .oneshot(request("GET", "/logs/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.contains("hive_data_"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with(r#""Timestamp","Event","Value","Status""#));
        assert!(csv.contains("Env: High Temp"));
    }

    #[tokio::test]
    async fn settings_validation_is_a_bad_request() {
        let response = api_routes(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/settings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"refresh_interval_ms": 10}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn settings_save_and_reset() {
        let state = create_test_state();

        let saved = body_json(
            api_routes(state.clone())
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/settings")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(r#"{"refresh_interval_ms": 5000, "audio_enabled": false}"#))
                        .unwrap(),
                )
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(saved["data"]["refresh_interval_ms"], 5000);
        assert_eq!(saved["data"]["audio_enabled"], false);

        let reset = body_json(api_routes(state).oneshot(request("DELETE", "/settings")).await.unwrap()).await;
        assert_eq!(reset["data"]["refresh_interval_ms"], 2000);
        assert_eq!(reset["data"]["audio_enabled"], true);
    }

    #[tokio::test]
    async fn detail_open_close_and_unknown_metric() {
        let state = create_test_state();
        api_routes(state.clone()).oneshot(request("POST", "/refresh")).await.unwrap();
        state.dashboard.acknowledge_alarm().await;

        let view = body_json(
            api_routes(state.clone())
                .oneshot(request("GET", "/detail/weight"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(view["data"]["title"], "Weight Trend");
        assert_eq!(view["data"]["stats"]["current"], 3.3);

        let bad = api_routes(state.clone())
            .oneshot(request("GET", "/detail/pressure"))
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let closed = body_json(api_routes(state.clone()).oneshot(request("DELETE", "/detail")).await.unwrap()).await;
        assert_eq!(closed["data"]["closed"], true);

        let none = api_routes(state).oneshot(request("GET", "/detail")).await.unwrap();
        assert_eq!(none.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn streams_and_health() {
        let state = create_test_state();

        let streams = body_json(api_routes(state.clone()).oneshot(request("GET", "/streams")).await.unwrap()).await;
        assert_eq!(streams["data"]["audio_url"], "http://127.0.0.1:5000/audio_feed");

        let health = body_json(api_routes(state).oneshot(request("GET", "/health")).await.unwrap()).await;
        assert_eq!(health["data"]["polling"], false);
        assert_eq!(health["data"]["settings_backend"], "in-memory");
    }
}
