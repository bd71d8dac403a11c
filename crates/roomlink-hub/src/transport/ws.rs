//! WebSocket session handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS for the lobby and lights endpoints
//! - Register the session's outbound queue with the realtime core
//! - Push the roster snapshot to new lobby sessions
//! - Decode each text frame once and hand it to the endpoint's dispatcher
//! - Lifecycle: ping/pong + idle timeout

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use roomlink_core::error::{ErrorCode, Result, RoomlinkError};
use roomlink_core::protocol::decode;

use crate::app_state::AppState;
use crate::realtime::{Connection, Endpoint, SessionCtx};
use crate::roster;

pub async fn lobby_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    upgrade(app, ws, Endpoint::Lobby)
}

pub async fn lights_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    upgrade(app, ws, Endpoint::Lights)
}

fn upgrade(app: AppState, ws: WebSocketUpgrade, endpoint: Endpoint) -> Response {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = run_session(app, endpoint, socket).await {
            tracing::warn!(%endpoint, error = %e, "session ended with error");
        }
    })
}

async fn run_session(app: AppState, endpoint: Endpoint, socket: WebSocket) -> Result<()> {
    let core = app.realtime();

    let (out_tx, out_rx) = mpsc::channel::<Message>(app.cfg().hub.queue_capacity);
    let id = core.sessions(endpoint).insert(Connection { tx: out_tx.clone() });

    let span = tracing::info_span!("session", %endpoint, session = id);
    let res = session_loop(app, endpoint, id, socket, out_tx, out_rx)
        .instrument(span)
        .await;

    core.sessions(endpoint).remove(id);
    tracing::info!(%endpoint, session = id, "session closed");
    res
}

async fn session_loop(
    app: AppState,
    endpoint: Endpoint,
    id: u64,
    socket: WebSocket,
    out_tx: mpsc::Sender<Message>,
    mut out_rx: mpsc::Receiver<Message>,
) -> Result<()> {
    tracing::info!("session opened");

    let ctx = SessionCtx::new(id, endpoint, app.realtime());
    let dispatcher = app.dispatcher(endpoint);

    let (mut ws_tx, mut ws_rx) = socket.split();

    if endpoint == Endpoint::Lobby && app.cfg().roster.enabled {
        let frame = roster::snapshot_frame(app.roster().as_ref()).await?;
        out_tx
            .send(Message::Text(frame))
            .await
            .map_err(|_| RoomlinkError::Internal("outbound channel closed".into()))?;
    }

    let hub = &app.cfg().hub;
    let ping_every = Duration::from_millis(hub.ping_interval_ms);
    let idle_timeout = Duration::from_millis(hub.idle_timeout_ms);

    // first ping one period after connect
    let mut ping_tick = tokio::time::interval_at(Instant::now() + ping_every, ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                match msg {
                    Message::Text(text) => {
                        let env = match decode(&text) {
                            Ok(env) => env,
                            Err(e) => {
                                tracing::warn!(error = %e, "undecodable frame, closing session");
                                break;
                            }
                        };

                        let header = env.header.clone();
                        match dispatcher.dispatch(ctx.clone(), env).await {
                            Ok(()) => {}
                            Err(e) if e.code() == ErrorCode::UnknownHeader => {
                                tracing::debug!(%header, "unhandled header skipped");
                            }
                            Err(e) => {
                                tracing::warn!(%header, code = e.code().as_str(), error = %e, "message rejected");
                            }
                        }
                    }
                    Message::Binary(b) => {
                        tracing::debug!(len = b.len(), "binary frame ignored");
                    }
                    Message::Ping(payload) => {
                        let _ = out_tx.try_send(Message::Pong(payload));
                    }
                    Message::Pong(_) => {}
                    Message::Close(_) => break,
                }
            }

            // ping
            _ = ping_tick.tick() => {
                let _ = out_tx.try_send(Message::Ping(Vec::new()));
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::info!("idle timeout");
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    }

    Ok(())
}
