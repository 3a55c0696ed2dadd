// API Server Binary Entry Point
//
// Purpose: Serve thermochron curves over HTTP
// Usage: cargo run --features api --bin api_server

use std::net::SocketAddr;
use thermochron::{create_router, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "thermochron=info,api_server=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = Config::from_env();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    tracing::info!("Configuration:");
    tracing::info!("  ARCHIVE_URL: {}", config.archive_url);
    tracing::info!("  GEOCODING_URL: {}", config.geocoding_url);
    tracing::info!("  CACHE_DIR: {:?}", config.cache_dir);
    tracing::info!("  TEMPERATURE_UNIT: {}", config.temperature_unit);
    tracing::info!("  PORT: {}", port);

    let state = AppState::new(&config)?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
