use serde::Deserialize;

use crate::{
    error::AppError,
    routes::{key_safe, validate_country, validate_symbol, validate_topic},
    upstream::{CalendarQuery, NewsQuery},
};

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub symbol: String,
}

impl PriceQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_symbol(&self.symbol)
    }

    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }

    pub fn cache_params(&self) -> Vec<(&'static str, String)> {
        vec![("symbol", self.normalized_symbol())]
    }
}

/// Trimmed dates and an uppercased country, so the key and the upstream call agree
pub fn normalize_calendar(query: &CalendarQuery) -> CalendarQuery {
    CalendarQuery {
        from: query.from.as_ref().map(|d| d.trim().to_string()),
        to: query.to.as_ref().map(|d| d.trim().to_string()),
        country: query.country.as_ref().map(|c| c.trim().to_ascii_uppercase()),
    }
}

/// Expects a query already passed through [`normalize_calendar`]
pub fn calendar_cache_params(query: &CalendarQuery) -> Vec<(&'static str, String)> {
    [
        ("from", &query.from),
        ("to", &query.to),
        ("country", &query.country),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.as_ref().map(|v| (name, key_safe(v))))
    .collect()
}

pub fn validate_calendar(query: &CalendarQuery) -> Result<(), AppError> {
    for date in [&query.from, &query.to].into_iter().flatten() {
        // %Y-%m-%d alone also accepts unpadded fields like 2024-1-1
        let date = date.trim();
        if date.len() != 10 || chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(AppError::Validation(format!(
                "Invalid date `{}`, expected YYYY-MM-DD",
                date
            )));
        }
    }
    if let Some(country) = &query.country {
        validate_country(country)?;
    }
    Ok(())
}

pub fn news_cache_params(query: &NewsQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(s) = &query.s {
        params.push(("s", s.trim().to_string()));
    }
    if let Some(t) = &query.t {
        params.push(("t", key_safe(t.trim())));
    }
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if let Some(offset) = query.offset {
        params.push(("offset", offset.to_string()));
    }
    params
}

pub fn validate_news(query: &NewsQuery) -> Result<(), AppError> {
    match (&query.s, &query.t) {
        (None, None) => Err(AppError::Validation(
            "Either `s` (ticker) or `t` (topic) is required".to_string(),
        )),
        (Some(s), t) => {
            validate_symbol(s)?;
            t.as_deref().map_or(Ok(()), validate_topic)
        }
        (None, Some(t)) => validate_topic(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Category, generate_cache_key};

    #[test]
    fn price_key_ignores_case_and_padding() {
        let a = PriceQuery {
            symbol: " eurusd.forex".into(),
        };
        let b = PriceQuery {
            symbol: "EURUSD.FOREX".into(),
        };
        assert_eq!(
            generate_cache_key(Category::Prices, a.cache_params()),
            generate_cache_key(Category::Prices, b.cache_params())
        );
    }

    #[test]
    fn calendar_key_skips_missing_filters() {
        let query = CalendarQuery {
            to: Some("2024-01-08".into()),
            from: Some("2024-01-01".into()),
            country: None,
        };
        assert_eq!(
            generate_cache_key(Category::Calendar, calendar_cache_params(&query)),
            "calendar:from=2024-01-01&to=2024-01-08"
        );
        assert!(validate_calendar(&query).is_ok());
    }

    #[test]
    fn country_cannot_smuggle_other_filters_into_the_key() {
        let genuine = CalendarQuery {
            country: Some("US".into()),
            from: Some("2024-01-01".into()),
            to: Some("2024-01-08".into()),
        };
        let crafted = CalendarQuery {
            country: Some("US&from=2024-01-01".into()),
            from: None,
            to: Some("2024-01-08".into()),
        };

        assert!(validate_calendar(&genuine).is_ok());
        assert!(matches!(validate_calendar(&crafted), Err(AppError::Validation(_))));
        assert_ne!(
            generate_cache_key(Category::Calendar, calendar_cache_params(&normalize_calendar(&crafted))),
            generate_cache_key(Category::Calendar, calendar_cache_params(&normalize_calendar(&genuine)))
        );
    }

    #[test]
    fn country_is_case_insensitive() {
        let lower = CalendarQuery {
            country: Some(" us".into()),
            ..Default::default()
        };
        assert!(validate_calendar(&lower).is_ok());
        assert_eq!(
            generate_cache_key(Category::Calendar, calendar_cache_params(&normalize_calendar(&lower))),
            "calendar:country=US"
        );
        for bad in ["U", "USAA", "U5", "US&"] {
            let query = CalendarQuery {
                country: Some(bad.into()),
                ..Default::default()
            };
            assert!(validate_calendar(&query).is_err(), "{bad}");
        }
    }

    #[test]
    fn calendar_rejects_malformed_dates() {
        let query = CalendarQuery {
            from: Some("01/01/2024".into()),
            ..Default::default()
        };
        assert!(matches!(validate_calendar(&query), Err(AppError::Validation(_))));

        let unpadded = CalendarQuery {
            to: Some("2024-1-8".into()),
            ..Default::default()
        };
        assert!(validate_calendar(&unpadded).is_err());
    }

    #[test]
    fn news_needs_ticker_or_topic() {
        assert!(validate_news(&NewsQuery::default()).is_err());
        let by_topic = NewsQuery {
            t: Some("inflation".into()),
            limit: Some(20),
            ..Default::default()
        };
        assert!(validate_news(&by_topic).is_ok());
        assert_eq!(
            generate_cache_key(Category::News, news_cache_params(&by_topic)),
            "news:limit=20&t=inflation"
        );

        let smuggled = NewsQuery {
            t: Some("oil&limit=5".into()),
            ..Default::default()
        };
        assert!(validate_news(&smuggled).is_err());
    }
}
