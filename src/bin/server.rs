//! LightWell HTTP Server Binary
//!
//! Main entry point for the LightWell REST API server. It loads the engine
//! configuration, initializes the measurement store, and starts serving.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) store (default)
//! cargo run --bin lightwell-server --features "local-repo,http-server"
//!
//! # Run against the Supabase store
//! SUPABASE_URL=https://project.supabase.co SUPABASE_KEY=... \
//!   cargo run --bin lightwell-server --features "supabase-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `SUPABASE_URL` / `SUPABASE_KEY`: store credentials (supabase-repo feature)
//! - `GROQ_API_KEY` / `GROQ_MODEL`: explanation endpoints (optional)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lightwell::config::EngineConfig;
use lightwell::db;
use lightwell::http::{create_router, AppState};
use lightwell::llm::GroqClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting LightWell HTTP Server");

    // Misconfigured tiers abort here, never per request.
    let engine = EngineConfig::from_default_location()?.with_env_overrides()?;
    info!(
        tiers = engine.tiers.len(),
        offset_minutes = engine.local_utc_offset_minutes,
        "Engine configuration loaded"
    );

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Measurement store initialized");

    let mut state = AppState::new(repository, engine);
    match GroqClient::from_env() {
        Ok(client) => {
            info!("Explanation client configured");
            state = state.with_llm(client);
        }
        Err(e) => {
            warn!("Explanation client disabled: {}", e);
        }
    }

    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
