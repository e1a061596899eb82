//! Health probes

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// Probe object is never created; any definitive answer proves the backend is
// reachable.
const PROBE_KEY: &str = "videos/.healthcheck";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    storage: String,
}

pub async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn readiness(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let check = tokio::time::timeout(STORAGE_CHECK_TIMEOUT, state.storage.exists(PROBE_KEY)).await;

    match check {
        Ok(Ok(_)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ready",
                storage: "healthy".to_string(),
            }),
        ),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    storage: format!("unhealthy: {}", e),
                }),
            )
        }
        Err(_) => {
            tracing::error!("Storage health check timed out");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    storage: "timed out".to_string(),
                }),
            )
        }
    }
}
