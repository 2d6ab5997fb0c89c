use axum::{extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{AppState, cache::GuardStats, utils::success_to_api_response};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> impl IntoResponse {
    success_to_api_response(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: GuardStats,
    pub window_secs: u64,
}

#[axum::debug_handler]
pub async fn cache_stats(State(state): State<AppState>) -> impl IntoResponse {
    success_to_api_response(CacheStatsResponse {
        stats: state.guard.stats(),
        window_secs: state.guard.retry_after_secs(),
    })
}
