use axum::{
    extract::{Query, State},
    response::Response,
};

use super::model::{
    PriceQuery, calendar_cache_params, news_cache_params, normalize_calendar, validate_calendar,
    validate_news,
};
use crate::{
    AppState,
    cache::{Category, generate_cache_key},
    error::AppError,
    middleware::ClientId,
    routes::cached_response,
    upstream::{CalendarQuery, NewsQuery},
};

#[axum::debug_handler]
pub async fn price(
    State(state): State<AppState>,
    client: ClientId,
    Query(query): Query<PriceQuery>,
) -> Result<Response, AppError> {
    query.validate()?;
    let symbol = query.normalized_symbol();
    let key = generate_cache_key(Category::Prices, query.cache_params());

    let (eodhd, symbol) = (&state.eodhd, symbol.as_str());
    let (data, status) = state
        .guard
        .fetch_through(client.as_str(), Category::Prices, &key, move || {
            eodhd.real_time(symbol)
        })
        .await?;

    Ok(cached_response(data, status))
}

#[axum::debug_handler]
pub async fn calendar(
    State(state): State<AppState>,
    client: ClientId,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, AppError> {
    validate_calendar(&query)?;
    let query = normalize_calendar(&query);
    let key = generate_cache_key(Category::Calendar, calendar_cache_params(&query));

    let (eodhd, query) = (&state.eodhd, &query);
    let (data, status) = state
        .guard
        .fetch_through(client.as_str(), Category::Calendar, &key, move || {
            eodhd.economic_events(query)
        })
        .await?;

    Ok(cached_response(data, status))
}

#[axum::debug_handler]
pub async fn news(
    State(state): State<AppState>,
    client: ClientId,
    Query(query): Query<NewsQuery>,
) -> Result<Response, AppError> {
    validate_news(&query)?;
    let key = generate_cache_key(Category::News, news_cache_params(&query));

    let (eodhd, query) = (&state.eodhd, &query);
    let (data, status) = state
        .guard
        .fetch_through(client.as_str(), Category::News, &key, move || eodhd.news(query))
        .await?;

    Ok(cached_response(data, status))
}
