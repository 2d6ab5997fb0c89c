use std::sync::Arc;

use cache::ApiGuard;
use config::Config;
use upstream::{EodhdClient, OpenAiClient};

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod upstream;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub guard: Arc<ApiGuard>,
    pub eodhd: EodhdClient,
    pub openai: OpenAiClient,
}

impl AppState {
    pub fn new(config: Config, guard: Arc<ApiGuard>, http: reqwest::Client) -> Self {
        let eodhd = EodhdClient::new(
            http.clone(),
            config.eodhd_base_url.clone(),
            config.eodhd_api_key.clone(),
        );
        let openai = OpenAiClient::new(
            http,
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        );
        Self {
            config,
            guard,
            eodhd,
            openai,
        }
    }
}
