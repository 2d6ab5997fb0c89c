pub mod analysis;
pub mod market;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{cache::CacheStatus, error::AppError, utils::success_to_api_response};

/// Cache-status header on proxied responses
pub const X_CACHE: &str = "x-cache";

/// Wrap a proxied payload in the envelope and tag it with where it came from
pub(crate) fn cached_response(data: Value, status: CacheStatus) -> Response {
    (
        StatusCode::OK,
        [(X_CACHE, status.as_str())],
        success_to_api_response(data),
    )
        .into_response()
}

/// Escape the key separators in free-text values so they cannot forge extra `name=value` pairs
pub(crate) fn key_safe(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}

/// Tickers look like `AAPL.US`, `EURUSD.FOREX`, `BTC-USD.CC` or `EURUSD=X`
pub(crate) fn validate_symbol(symbol: &str) -> Result<(), AppError> {
    let symbol = symbol.trim();
    let valid = !symbol.is_empty()
        && symbol.len() <= 32
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '^' | '='));
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid symbol `{}`", symbol)))
    }
}

/// ISO 3166 alpha-2 or alpha-3 code, any case
pub(crate) fn validate_country(country: &str) -> Result<(), AppError> {
    let country = country.trim();
    if (2..=3).contains(&country.len()) && country.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid country `{}`, expected a 2 or 3 letter code",
            country
        )))
    }
}

/// News topic tags are words like `inflation` or `mergers and acquisitions`
pub(crate) fn validate_topic(topic: &str) -> Result<(), AppError> {
    let topic = topic.trim();
    let valid = !topic.is_empty()
        && topic.len() <= 64
        && topic
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid topic `{}`", topic)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_rules() {
        assert!(validate_symbol("EURUSD.FOREX").is_ok());
        assert!(validate_symbol("^GSPC").is_ok());
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("AAPL/../x").is_err());
        assert!(validate_symbol("AAPL.US&language=en").is_err());
    }

    #[test]
    fn country_rules() {
        assert!(validate_country("US").is_ok());
        assert!(validate_country("sau").is_ok());
        assert!(validate_country("US&from=2024-01-01").is_err());
        assert!(validate_country("").is_err());
    }

    #[test]
    fn key_safe_escapes_separators() {
        assert_eq!(key_safe("a&b=c%d"), "a%26b%3Dc%25d");
        assert_eq!(key_safe("plain text"), "plain text");
        // escaping is injective: a literal "%26" stays distinct from "&"
        assert_ne!(key_safe("%26"), key_safe("&"));
    }
}
