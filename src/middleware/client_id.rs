use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use crate::AppState;

/// Shared bucket for callers without any identifiable address
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Rate-limit identity of the caller.
///
/// Behind a trusted proxy this is `X-Real-IP`, then the first non-empty `X-Forwarded-For` hop,
/// then the socket peer address. Otherwise the headers are ignored, since a direct caller could
/// rotate them to get a fresh budget on every request. Callers with no address at all share
/// [`UNKNOWN_CLIENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Self {
        let remote_ip = peer.map(|addr| addr.ip().to_string());
        if !trust_proxy {
            return ClientId(remote_ip.unwrap_or_else(|| UNKNOWN_CLIENT.to_string()));
        }

        let ip = headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                headers
                    .get("x-forwarded-for")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
            })
            .or(remote_ip.as_deref())
            .unwrap_or(UNKNOWN_CLIENT)
            .trim()
            .to_string();

        ClientId(ip)
    }
}

impl FromRequestParts<AppState> for ClientId {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);
        let client =
            ClientId::resolve(&parts.headers, peer, state.config.trust_proxy_headers);
        tracing::debug!("client id: {}", client.0);
        Ok(client)
    }
}
