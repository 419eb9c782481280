//! Dialog Arcade - grid games played by voice
//!
//! A webhook server for a voice assistant. Each conversation owns a tree of
//! dialog machines: a lobby at the root and at most one running game.

mod api;
mod config;
mod dialog;
mod games;
mod machines;

use api::{create_router, AppState};
use config::ArcadeConfig;
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dialog_arcade=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ArcadeConfig::from_env();
    match config.seed {
        Some(seed) => tracing::info!(seed, "Using fixed random seed"),
        None => tracing::info!("Seeding sessions from OS entropy"),
    }

    // Create application state
    let state = AppState::new(&config, machines::root);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Dialog arcade listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
