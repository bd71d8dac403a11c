//! roomlink terminal client
//!
//! Opens the lobby (roster + chat) and lights connections configured in
//! `roomlink.yaml` (or the path given as the first argument) and draws their
//! state to stdout.
//!
//! Input, one command per line:
//! - `/light` : flip the light
//! - `/quit`  : exit
//! - anything else is sent as a chat line

use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use roomlink_client::feature::{LightsClient, LobbyClient};
use roomlink_client::render::{RenderSink, TerminalSink};
use roomlink_client::{config, transport};
use roomlink_core::error::{Result, RoomlinkError};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "roomlink exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "roomlink.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let sink: Arc<dyn RenderSink> = Arc::new(TerminalSink::new());

    let lobby = cfg.lobby.enabled.then(|| {
        let sink = Arc::clone(&sink);
        let cap = cfg.chat.max_entries;
        transport::spawn(cfg.lobby.url.clone(), move |out| {
            LobbyClient::new(Arc::clone(&sink), cap).dispatcher(out, sink)
        })
    });

    let lights = cfg.lights.enabled.then(|| {
        let sink = Arc::clone(&sink);
        let strict = cfg.lights.strict;
        transport::spawn(cfg.lights.url.clone(), move |out| {
            LightsClient::new(Arc::clone(&sink), strict).dispatcher(out, sink)
        })
    });

    tracing::info!(%path, lobby = lobby.is_some(), lights = lights.is_some(), "roomlink started");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| RoomlinkError::Internal(format!("stdin read failed: {e}")))?
    {
        let cmd = line.trim().to_owned();
        let res = match cmd.as_str() {
            "/quit" => break,
            "/light" => match &lights {
                Some(s) => s.actions.submit(|c: &mut LightsClient| c.click()),
                None => Err(RoomlinkError::BadConfig("lights disabled".into())),
            },
            _ => match &lobby {
                Some(s) => s
                    .actions
                    .submit(move |c: &mut LobbyClient| c.submit_chat(&line)),
                None => Err(RoomlinkError::BadConfig("lobby disabled".into())),
            },
        };
        if let Err(e) = res {
            tracing::warn!(error = %e, "input ignored");
        }
    }

    Ok(())
}
