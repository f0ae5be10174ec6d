use std::sync::Arc;

use axum::{Json, extract::State};

use crate::AppState;
use crate::models::HealthResponse;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Relay is up", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.tutor.model().to_string(),
        timestamp: chrono::Utc::now(),
    })
}
