// src/main.rs
mod config;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod storage;
mod templates;
mod utils;

use crate::config::Config;
use crate::middleware::rate_limit::RateLimiter;
use crate::routes::create_router;
use crate::services::directory::generate_directory;
use crate::services::feed::NodeFeed;
use crate::services::prpc::{HttpTransport, PrpcClient};
use crate::services::simulation::{JitterSimulator, Simulator};
use crate::storage::settings::SettingsStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub struct AppState {
    pub config: Config,
    pub feed: NodeFeed,
    pub settings: SettingsStore,
    pub rate_limiter: Arc<RateLimiter>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_line_number(true)
        .init();

    tracing::info!("🚀 Starting pNode dashboard...");

    let config = Config::from_env()?;

    // Stable for the life of the process so the fallback view does not reshuffle.
    let fallback = Arc::new(generate_directory(&mut rand::thread_rng()));
    tracing::info!("📦 Generated fallback directory with {} pNodes", fallback.len());

    let transport = Arc::new(HttpTransport::new(config.prpc_timeout())?);
    let client = PrpcClient::new(&config.prpc_endpoint, transport, fallback);
    tracing::info!("🔌 pRPC endpoint: {}", client.endpoint());

    let feed = NodeFeed::new(client);
    let initial = feed.refresh().await;
    tracing::info!("✓ Initial snapshot holds {} pNodes", initial);

    let simulation = config.simulate_telemetry.then(|| {
        let simulator: Arc<dyn Simulator> = Arc::new(JitterSimulator);
        (simulator, config.simulation_interval())
    });
    let _feed_handle = feed.spawn(config.poll_interval(), simulation);

    let rate_limiter = Arc::new(
        RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60))
            .trust_proxy_headers(config.trust_proxy_headers),
    );

    // Rate limiter cleanup task
    let rate_limiter_clone = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter_clone.cleanup().await;
            tracing::debug!("Rate limiter cleanup completed");
        }
    });

    let settings = SettingsStore::new(&config.data_dir);
    tracing::info!("⚙️  Settings file: {}", settings.path().display());

    let addr = config.server_addr()?;
    let state = Arc::new(AppState {
        config,
        feed,
        settings,
        rate_limiter,
    });

    let app = create_router(state);

    tracing::info!("✅ pNode dashboard listening on {}", addr);
    tracing::info!("🌐 Web UI: http://{}/dashboard", addr);
    tracing::info!("🔌 API: http://{}/api", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
