use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{UpstreamError, ensure_success};

const SERVICE: &str = "eodhd";
const PRICE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Economic calendar filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// News filter: ticker (`s`) or topic tag (`t`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Clone)]
pub struct EodhdClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl EodhdClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Latest quote for one symbol, e.g. `EURUSD.FOREX`
    pub async fn real_time(&self, symbol: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}/real-time/{}", self.base_url, symbol);
        let no_filters: [(&str, &str); 0] = [];
        self.get_json(&url, &no_filters, PRICE_TIMEOUT).await
    }

    pub async fn economic_events(&self, query: &CalendarQuery) -> Result<Value, UpstreamError> {
        let url = format!("{}/economic-events", self.base_url);
        self.get_json(&url, query, DEFAULT_TIMEOUT).await
    }

    pub async fn news(&self, query: &NewsQuery) -> Result<Value, UpstreamError> {
        let url = format!("{}/news", self.base_url);
        self.get_json(&url, query, DEFAULT_TIMEOUT).await
    }

    async fn get_json<Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        tracing::debug!("EODHD request: {}", url);
        let response = self
            .client
            .get(url)
            .query(&[("api_token", self.api_key.as_str()), ("fmt", "json")])
            .query(query)
            .timeout(timeout)
            .send()
            .await
            // the URL carries api_token, keep it out of error messages
            .map_err(|source| UpstreamError::Request {
                service: SERVICE,
                source: source.without_url(),
            })?;

        ensure_success(SERVICE, response)
            .await?
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::InvalidResponse {
                service: SERVICE,
                reason: e.without_url().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_are_not_serialized() {
        let query = NewsQuery {
            s: Some("AAPL.US".into()),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({"s": "AAPL.US", "limit": 10})
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = EodhdClient::new(Client::new(), "https://eodhd.com/api/", "demo");
        assert_eq!(client.base_url, "https://eodhd.com/api");
    }
}
