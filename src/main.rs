use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use finance_gateway::{
    AppState,
    cache::{ApiGuard, spawn_sweeper},
    config::Config,
    router::create_router,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    // an incomplete or zeroed category table aborts startup
    let policies = config.policies().expect("Invalid cache policy table");
    let guard = Arc::new(ApiGuard::new(policies));
    let sweeper = spawn_sweeper(guard.clone(), config.cache_cleanup_interval());
    tracing::info!(
        "Cache sweeper running every {}s, rate-limit window {}s",
        config.cache_cleanup_interval_secs,
        config.rate_limit_window_secs
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("finance-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client");

    let state = AppState::new(config.clone(), guard, http);
    let router = create_router(state);

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding permissive CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    #[cfg(not(debug_assertions))]
    let router = router.layer(CorsLayer::new());

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}{}", addr, config.api_base_uri);

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");

    sweeper.abort();
}
