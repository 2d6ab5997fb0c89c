use std::collections::BTreeMap;

use super::category::Category;

/// Build the cache key for a request: `category:` followed by the parameters sorted by name
/// and joined as `name=value` with `&`.
///
/// Values are used verbatim, so callers must not pass values whose string forms collide.
pub fn generate_cache_key<I, K, V>(category: Category, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();

    let query = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}:{}", category.as_str(), query)
}

/// Client/category bucket key for the rate limiter
pub fn rate_limit_key(client_id: &str, category: Category) -> String {
    format!("{}:{}", client_id, category.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn key_is_stable_under_parameter_reordering() {
        let a = generate_cache_key(Category::Prices, [("symbol", "EURUSD"), ("fmt", "json")]);
        let b = generate_cache_key(Category::Prices, [("fmt", "json"), ("symbol", "EURUSD")]);
        assert_eq!(a, b);
        assert_eq!(a, "prices:fmt=json&symbol=EURUSD");
    }

    #[test]
    fn key_from_hash_map_matches_key_from_pairs() {
        let mut params = HashMap::new();
        params.insert("to".to_string(), "2024-01-08".to_string());
        params.insert("from".to_string(), "2024-01-01".to_string());

        assert_eq!(
            generate_cache_key(Category::Calendar, &params),
            "calendar:from=2024-01-01&to=2024-01-08"
        );
    }

    #[test]
    fn categories_partition_the_key_space() {
        let params = [("s", "AAPL.US")];
        assert_ne!(
            generate_cache_key(Category::News, params),
            generate_cache_key(Category::Prices, params)
        );
    }

    #[test]
    fn empty_params_yield_bare_prefix() {
        let none: [(&str, &str); 0] = [];
        assert_eq!(generate_cache_key(Category::Analysis, none), "analysis:");
    }

    #[test]
    fn rate_limit_key_joins_client_and_category() {
        assert_eq!(rate_limit_key("10.0.0.1", Category::News), "10.0.0.1:news");
    }
}
