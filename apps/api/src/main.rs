mod config;
mod errors;
mod llm_client;
mod persona;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::persona::generator::PersonaGenerator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Persona API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generator around the configured provider
    let generator = PersonaGenerator::from_settings(config.llm.clone())
        .context("Failed to build LLM provider")?;
    info!(
        "LLM provider initialized ({}, model: {}, timeout: {}s)",
        generator.provider_name(),
        generator.model(),
        config.llm.timeout.as_secs()
    );
    if !generator.is_configured() {
        warn!("LLM_API_KEY is not set; persona generation will fail until it is");
    }

    let state = AppState { generator };

    // Browser UI calls this directly, hence permissive CORS
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
