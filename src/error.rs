use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    cache::GuardError,
    upstream::UpstreamError,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("too many requests, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Serialize)]
struct RetryHint {
    retry_after: u64,
}

impl From<GuardError<UpstreamError>> for AppError {
    fn from(err: GuardError<UpstreamError>) -> Self {
        match err {
            GuardError::RateLimited { retry_after_secs } => {
                AppError::RateLimited { retry_after_secs }
            }
            GuardError::Upstream(e) => AppError::Upstream(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::RateLimited { retry_after_secs } => {
                let mut body = success_to_api_response(RetryHint {
                    retry_after: retry_after_secs,
                });
                body.code = error_codes::RATE_LIMIT;
                body.msg = format!("Too many requests, please retry in {} seconds", retry_after_secs);

                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                error_to_api_response::<()>(error_codes::VALIDATION_ERROR, msg),
            )
                .into_response(),
            AppError::Upstream(e) => {
                tracing::error!("Upstream failure: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    error_to_api_response::<()>(error_codes::UPSTREAM_ERROR, e.to_string()),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn rate_limited_renders_429_with_retry_hint() {
        let response = AppError::RateLimited {
            retry_after_secs: 60,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");

        let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], error_codes::RATE_LIMIT);
        assert_eq!(body["resp_data"]["retry_after"], 60);
    }

    #[test]
    fn guard_errors_map_onto_app_errors() {
        let err: AppError = GuardError::<UpstreamError>::RateLimited {
            retry_after_secs: 60,
        }
        .into();
        assert!(matches!(err, AppError::RateLimited { retry_after_secs: 60 }));

        let err: AppError = GuardError::Upstream(UpstreamError::Status {
            service: "eodhd",
            status: 503,
        })
        .into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
