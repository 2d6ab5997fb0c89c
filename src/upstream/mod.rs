//! Thin HTTP clients for the third-party services behind the gateway.
//! Payloads are passed through as opaque JSON.

mod eodhd;
mod openai;

pub use eodhd::{CalendarQuery, EodhdClient, NewsQuery};
pub use openai::OpenAiClient;

use reqwest::Response;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{service} returned an unusable response: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
}

/// Reject non-2xx responses, logging whatever body came back
pub(crate) async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown".to_string());
    tracing::warn!("{} responded {}: {}", service, status, error_text);
    Err(UpstreamError::Status {
        service,
        status: status.as_u16(),
    })
}
