// src/main.rs

use std::{net::SocketAddr, sync::Arc};

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vidora::{
    config::Config,
    routes,
    state::AppState,
    store::{LocalBlobStore, seed::seed_demo_data},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set, using the development secret");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!("Storing uploads in {}", config.upload_dir.display());

    // Create AppState
    let blobs = Arc::new(LocalBlobStore::new(config.upload_dir.clone()));
    let port = config.port;
    let state = AppState::in_memory(config, blobs);

    // Seed Demo Data
    if state.config.seed_demo_data {
        if let Err(e) = seed_demo_data(&state).await {
            tracing::error!("Failed to seed demo data: {}", e);
        }
    }

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Vidora API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
