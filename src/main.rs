// =============================================================================
// Goldcast — Main Entry Point
// =============================================================================
//
// A small local-first service: six manually entered market quotes in, a
// Rise/Dip/Flat gold forecast out, served over a REST API.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod feedback;
mod forecast;
mod forecast_log;
mod prefs;
mod render;
mod runtime_config;
mod share;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::prefs::JsonPreferenceStore;
use crate::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "goldcast_config.json";
const PREFS_PATH: &str = "goldcast_prefs.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Goldcast — Gold Trend Forecast Service            ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    info!(
        market = %config.market_label,
        share_dir = %config.share_dir,
        "Configured forecast market"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let preferences = Arc::new(JsonPreferenceStore::open(PREFS_PATH));
    let state = Arc::new(AppState::new(config, preferences));

    // ── 3. Start the API server ──────────────────────────────────────────
    let bind_addr =
        std::env::var("GOLDCAST_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3002".into());

    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    info!("Service running. Press Ctrl+C to stop.");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");

    if let Err(e) = state.runtime_config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("Goldcast shut down complete.");
    Ok(())
}
