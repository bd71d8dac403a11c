//! Server-wide text events relayed to the lobby as `servermsg`.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};

use roomlink_core::error::Result;
use roomlink_core::protocol::{encode, Header};

use super::query::QueryConn;
use super::wire::parse_record;
use crate::config::TeamSpeakSection;
use crate::realtime::{Endpoint, RealtimeCore};

const RECONNECT_AFTER: Duration = Duration::from_secs(5);

/// Message text of a `notifytextmessage` event from a real client.
///
/// Events sent by the server itself (`invokerid=0`) and any other line give `None`.
pub fn server_text(line: &str) -> Option<String> {
    let rec = parse_record(line.strip_prefix("notifytextmessage ")?);
    if rec.get("invokerid").map(String::as_str) == Some("0") {
        return None;
    }
    rec.get("msg").cloned()
}

/// Keep a text-event subscription open, reconnecting after failures.
pub fn spawn_listener(cfg: TeamSpeakSection, core: Arc<RealtimeCore>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = listen(&cfg, &core).await {
                tracing::warn!(addr = %cfg.addr, error = %e, "teamspeak text events interrupted");
            }
            time::sleep(RECONNECT_AFTER).await;
        }
    })
}

async fn listen(cfg: &TeamSpeakSection, core: &RealtimeCore) -> Result<()> {
    let mut conn = QueryConn::open(cfg).await?;
    conn.exec("servernotifyregister event=textserver").await?;
    tracing::info!(addr = %cfg.addr, "subscribed to teamspeak text events");

    let every = Duration::from_millis(cfg.keepalive_ms);
    let mut keepalive = time::interval_at(Instant::now() + every, every);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = conn.read_line() => {
                let line = line?;
                let Some(text) = server_text(&line) else {
                    continue;
                };
                let frame = encode(Header::ServerMsg.as_str(), &text)?;
                let delivered = core.sessions(Endpoint::Lobby).broadcast(&frame);
                tracing::debug!(delivered, "teamspeak message relayed");
            }
            _ = keepalive.tick() => {
                // status reply arrives as an ordinary line and is ignored above
                conn.send_line("whoami").await?;
            }
        }
    }
}
