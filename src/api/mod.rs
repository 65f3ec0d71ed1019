//! REST API module using Axum
//!
//! Presentation surface for the hive dashboard. Every handler is a thin
//! adapter over a [`Dashboard`](crate::pipeline::Dashboard) operation; the
//! pipeline never depends on this module.

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Environment variable listing allowed CORS origins (comma-separated).
pub const CORS_ORIGINS_ENV_VAR: &str = "HIVE_CORS_ORIGINS";

/// Build the CORS layer.
///
/// With `HIVE_CORS_ORIGINS` set, only those origins are allowed. Without it
/// any origin may read the API, since the dashboard frontend is usually
/// served from a different host than the monitor.
fn build_cors_layer() -> CorsLayer {
    match std::env::var(CORS_ORIGINS_ENV_VAR) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
