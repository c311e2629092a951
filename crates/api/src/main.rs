//! Trip-story relay server
//!
//! Provides REST endpoints for:
//! - Story generation from 14 photos and a keyword
//! - Length, keyword and similarity analysis of a story
//! - Plain-text export

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod retry;
mod state;

use config::AppConfig;
use state::AppState;

const DEFAULT_LOG_FILTER: &str = "api=info,relay=info,similarity=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    // Reads .env first so RUST_LOG and LOG_FORMAT can come from it
    let config = AppConfig::from_env()?;
    init_tracing()?;

    info!(
        port = config.server.port,
        model = %config.upstream.model,
        max_retries = config.retry.max_retries,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    let state = Arc::new(AppState::new(config)?);
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server.port));
    let app = build_router(state);

    info!("Starting story relay on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration for the browser editor
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/generate-story", post(handlers::generate_story))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/export", post(handlers::export))
        .route("/metrics", get(handlers::metrics))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
