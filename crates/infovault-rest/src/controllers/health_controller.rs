//! Health check controller.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::warn;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Readiness of each backing store.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub database: &'static str,
    pub cache: &'static str,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Connect policy sent with the banner, overriding the router-wide default.
pub const PING_CONTENT_SECURITY_POLICY: &str = "connect-src http://localhost:8080";

/// Banner endpoint.
pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_SECURITY_POLICY, PING_CONTENT_SECURITY_POLICY)],
        format!("Infovault API | {}", state.version),
    )
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version,
    })
}

/// Readiness check endpoint. Answers 503 unless MySQL and the cache both respond.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let (database, cache) = tokio::join!(state.database.health_check(), state.cache.ping());

    let database = match database {
        Ok(()) => "up",
        Err(e) => {
            warn!("Database not ready: {}", e);
            "down"
        }
    };
    let cache = match cache {
        Ok(()) => "up",
        Err(e) => {
            warn!("Cache not ready: {}", e);
            "down"
        }
    };

    let status = if database == "up" && cache == "up" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { database, cache }))
}

/// Liveness check endpoint.
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
