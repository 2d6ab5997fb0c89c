use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware::log_errors, routes};

pub fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/eodhd-price", get(routes::market::price))
        .route("/eodhd-calendar", get(routes::market::calendar))
        .route("/eodhd-news", get(routes::market::news))
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/ai-analysis", post(routes::analysis::ai_analysis))
        .route("/translate", post(routes::analysis::translate))
}

pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::status::health))
        .route("/cache-stats", get(routes::status::cache_stats))
}

/// Full API under the configured base path, with error logging applied
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(market_routes())
        .merge(analysis_routes())
        .merge(status_routes());

    let base = state.config.api_base_uri.trim_end_matches('/');
    // axum refuses to nest at the root
    let router = if base.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(base, api)
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
