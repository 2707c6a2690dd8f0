// POST /api/technews - ingest a tech-news summary from the AI service

use std::time::Duration;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::generate_key;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub const TECHNEWS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Deserialize)]
pub struct TechNewsRequest {
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechNewsSummary {
    pub summary: String,
    pub received_at: DateTime<Utc>,
}

pub fn latest_technews_key() -> String {
    generate_key("technews", &[Some(&"latest")])
}

pub async fn technews_post(
    State(state): State<AppState>,
    payload: Result<Json<TechNewsRequest>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<TechNewsSummary> {
    let Json(payload) = payload?;

    let summary = payload.summary.trim();
    if summary.is_empty() {
        return Err(ApiError::bad_request("Summary must not be empty"));
    }

    // Older summaries are superseded wholesale
    let dropped = state.cache.remove_by_pattern("^technews:");
    tracing::debug!("Dropped {} stale tech news entries", dropped);

    let entry = TechNewsSummary {
        summary: summary.to_string(),
        received_at: Utc::now(),
    };
    state.cache.set(&latest_technews_key(), &entry, Some(TECHNEWS_TTL));
    tracing::info!("Stored tech news summary ({} chars)", entry.summary.len());

    Ok(ApiResponse::accepted(entry))
}
