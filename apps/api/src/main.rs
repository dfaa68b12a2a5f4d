mod ai_client;
mod catalog;
mod config;
mod errors;
mod models;
mod recommendation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::AiClient;
use crate::catalog::{CatalogSource, HttpCatalog, StaticCatalog};
use crate::config::{CatalogLocation, Config};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting course recommender v{}", env!("CARGO_PKG_VERSION"));

    // Initialize catalog source
    let catalog = build_catalog(&config.catalog)?;
    info!("Catalog source initialized ({})", catalog.name());

    // Initialize AI backend client
    let ai = AiClient::new(
        config.genai_service_url.clone(),
        Duration::from_secs(config.ai_timeout_secs),
    )?
    .with_retry_base_delay(Duration::from_millis(config.ai_retry_base_delay_ms));
    info!(
        "AI client initialized ({}, fallback {})",
        config.genai_service_url,
        if config.ai_fallback_enabled { "on" } else { "off" }
    );

    // Build app state
    let state = AppState {
        catalog,
        backend: Arc::new(ai),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser client calls us directly

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_catalog(location: &CatalogLocation) -> Result<Arc<dyn CatalogSource>> {
    let catalog: Arc<dyn CatalogSource> = match location {
        CatalogLocation::Snapshot(path) => Arc::new(StaticCatalog::from_json_file(path)?),
        CatalogLocation::Service(url) => Arc::new(HttpCatalog::new(url.clone())?),
    };
    Ok(catalog)
}
