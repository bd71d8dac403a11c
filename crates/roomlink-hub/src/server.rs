//! Hub startup: bind the listener, spawn the background tasks, serve.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use roomlink_core::error::{Result, RoomlinkError};

use crate::app_state::AppState;
use crate::{roster, router, teamspeak};

/// A running hub.
pub struct Running {
    pub addr: SocketAddr,
    pub server: JoinHandle<()>,
    /// Roster push and TeamSpeak text listener, when enabled.
    pub background: Vec<JoinHandle<()>>,
}

impl Running {
    pub fn abort(&self) {
        self.server.abort();
        for task in &self.background {
            task.abort();
        }
    }
}

/// Bind `hub.listen` and start serving in the background.
///
/// A port of `0` picks an ephemeral port; the bound address is returned.
pub async fn start(state: AppState) -> Result<Running> {
    let listen: SocketAddr = state
        .cfg()
        .hub
        .listen
        .parse()
        .map_err(|e| RoomlinkError::BadConfig(format!("hub.listen must be a socket address: {e}")))?;

    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| RoomlinkError::Internal(format!("failed to bind {listen}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| RoomlinkError::Internal(format!("local_addr failed: {e}")))?;

    let cfg = state.cfg();
    let mut background = Vec::new();
    if cfg.roster.enabled {
        background.push(roster::spawn_push(
            state.realtime(),
            state.roster(),
            Duration::from_millis(cfg.roster.interval_ms),
        ));
    }
    if cfg.teamspeak.enabled && cfg.server_messages.enabled {
        background.push(teamspeak::spawn_listener(
            cfg.teamspeak.clone(),
            state.realtime(),
        ));
    }

    let app = router::build_router(state);
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server failed");
        }
    });

    tracing::info!(%addr, "roomlink-hub listening");
    Ok(Running {
        addr,
        server,
        background,
    })
}
