use axum::{
    extract::{Json, State},
    response::Response,
};

use super::model::{AnalysisRequest, AnalysisResponse, TranslateRequest, TranslateResponse};
use crate::{
    AppState,
    cache::{Category, generate_cache_key},
    error::AppError,
    middleware::ClientId,
    routes::cached_response,
    upstream::UpstreamError,
};

#[axum::debug_handler]
pub async fn ai_analysis(
    State(state): State<AppState>,
    client: ClientId,
    Json(req): Json<AnalysisRequest>,
) -> Result<Response, AppError> {
    req.validate()?;
    let key = generate_cache_key(Category::Analysis, req.cache_params());

    let (openai, req) = (&state.openai, &req);
    let (data, status) = state
        .guard
        .fetch_through(client.as_str(), Category::Analysis, &key, move || async move {
            let analysis = openai
                .complete(&req.system_prompt(), &req.user_prompt())
                .await?;
            to_value(AnalysisResponse {
                symbol: req.symbol.trim().to_uppercase(),
                language: req.language,
                analysis,
            })
        })
        .await?;

    Ok(cached_response(data, status))
}

/// Translations share the analysis budget and TTL, both go to the same model
#[axum::debug_handler]
pub async fn translate(
    State(state): State<AppState>,
    client: ClientId,
    Json(req): Json<TranslateRequest>,
) -> Result<Response, AppError> {
    req.validate()?;
    let key = generate_cache_key(Category::Analysis, req.cache_params());

    let (openai, req) = (&state.openai, &req);
    let (data, status) = state
        .guard
        .fetch_through(client.as_str(), Category::Analysis, &key, move || async move {
            let translation = openai
                .complete(&req.system_prompt(), req.text.trim())
                .await?;
            to_value(TranslateResponse {
                target: req.target,
                translation,
            })
        })
        .await?;

    Ok(cached_response(data, status))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<serde_json::Value, UpstreamError> {
    serde_json::to_value(value).map_err(|e| UpstreamError::InvalidResponse {
        service: "openai",
        reason: e.to_string(),
    })
}
