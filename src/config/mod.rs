use std::env;
use std::time::Duration;

use crate::cache::{CategoryError, PolicyTable};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error(transparent)]
    Policy(#[from] CategoryError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub eodhd_api_key: String,
    pub eodhd_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub rate_limit_window_secs: u64,
    pub cache_cleanup_interval_secs: u64,
    /// Honour `X-Real-IP` / `X-Forwarded-For`; only safe behind a proxy that sets them
    pub trust_proxy_headers: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let config = Config {
            server_host: var_or("SERVER_HOST", "0.0.0.0"),
            server_port: parse_or("SERVER_PORT", 3000)?,
            api_base_uri: var_or("API_BASE_URI", "/api"),
            eodhd_api_key: required("EODHD_API_KEY")?,
            eodhd_base_url: var_or("EODHD_BASE_URL", "https://eodhd.com/api"),
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: var_or("OPENAI_MODEL", "gpt-4o-mini"),
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW", 60)?,
            cache_cleanup_interval_secs: parse_or("CACHE_CLEANUP_INTERVAL", 300)?,
            trust_proxy_headers: parse_or("TRUST_PROXY_HEADERS", false)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would leave the gateway running without its limits or sweeper
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_cleanup_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "CACHE_CLEANUP_INTERVAL",
                value: "0".to_string(),
            });
        }
        self.policies()?;
        Ok(())
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval_secs)
    }

    /// Standard category table with the configured window; rejected if the window is zero
    pub fn policies(&self) -> Result<PolicyTable, ConfigError> {
        Ok(PolicyTable::standard().with_window(self.rate_limit_window())?)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    parse_value(name, env::var(name).ok(), default)
}

fn parse_value<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
