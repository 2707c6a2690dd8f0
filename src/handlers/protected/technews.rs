// GET /api/technews - most recent summary pushed by the AI service

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::handlers::internal::{latest_technews_key, TechNewsSummary};
use crate::middleware::ApiResponse;
use crate::state::AppState;

pub const NO_TECHNEWS: &str = "No tech news for now";

#[derive(Debug, Serialize)]
pub struct LatestTechNews {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl From<TechNewsSummary> for LatestTechNews {
    fn from(stored: TechNewsSummary) -> Self {
        Self {
            summary: stored.summary,
            received_at: Some(stored.received_at),
        }
    }
}

/// Always 200; an empty cache answers with a placeholder summary.
pub async fn technews_latest_get(State(state): State<AppState>) -> ApiResponse<LatestTechNews> {
    let latest = match state.cache.get::<TechNewsSummary>(&latest_technews_key()) {
        Some(stored) => stored.into(),
        None => {
            tracing::debug!("No tech news summary cached");
            LatestTechNews {
                summary: NO_TECHNEWS.to_string(),
                received_at: None,
            }
        }
    };
    ApiResponse::success(latest)
}
