//! roomlink hub
//!
//! - WebSocket endpoints: `/ws` (roster + chat), `/lights/ws` (light toggle)
//! - Liveness: `/healthz`
//! - Config: `roomlink-hub.yaml`, or the path given as the first argument

use tracing_subscriber::{fmt, EnvFilter};

use roomlink_core::error::Result;
use roomlink_hub::{app_state, config, server};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.code().as_str(), "roomlink-hub exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "roomlink-hub.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let state = app_state::AppState::new(cfg)?;
    let mut running = server::start(state).await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested");
        }
        res = &mut running.server => {
            if let Err(e) = res {
                tracing::error!(error = %e, "server task ended");
            }
        }
    }
    running.abort();

    Ok(())
}
