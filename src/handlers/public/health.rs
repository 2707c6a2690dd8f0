// GET /health - liveness plus cache occupancy

use axum::extract::State;
use serde::Serialize;

use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache_entries: usize,
}

pub async fn health_get(State(state): State<AppState>) -> ApiResponse<HealthReport> {
    ApiResponse::success(HealthReport {
        status: "ok",
        timestamp: chrono::Utc::now(),
        cache_entries: state.cache.len(),
    })
}
