//! WebSocket driver.
//!
//! One task per connection. Inbound frames, queued outbound frames and UI
//! actions all pass through a single `select!` loop, so handlers never overlap
//! and the models need no locking.
//!
//! There is no reconnect: once the socket closes or errors the dispatcher
//! reaches `Closed`, the loop ends, and further actions are rejected.
//! Actions still queued at that point are rejected and logged.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::Instrument;

use roomlink_core::error::{Result, RoomlinkError};

use crate::dispatch::{Dispatcher, Feature};
use crate::outbound::{ChannelOutbound, Outbound, Outgoing};

/// A UI action queued for the connection task.
pub type Action<F> = Box<dyn FnOnce(&mut F) -> Result<Option<Outgoing>> + Send>;

/// Cloneable handle the UI uses to submit actions.
pub struct ActionSender<F> {
    tx: mpsc::UnboundedSender<Action<F>>,
}

impl<F> Clone for ActionSender<F> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<F> ActionSender<F> {
    /// Queue an action. Fails once the connection task has finished.
    pub fn submit<A>(&self, action: A) -> Result<()>
    where
        A: FnOnce(&mut F) -> Result<Option<Outgoing>> + Send + 'static,
    {
        self.tx
            .send(Box::new(action))
            .map_err(|_| RoomlinkError::ConnectionClosed)
    }
}

/// Create an action queue.
pub fn actions<F>() -> (ActionSender<F>, mpsc::UnboundedReceiver<Action<F>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ActionSender { tx }, rx)
}

/// A spawned connection.
pub struct Session<F> {
    pub actions: ActionSender<F>,
    /// Resolves to the dispatcher once the connection has closed.
    pub handle: JoinHandle<Dispatcher<F>>,
}

/// Spawn a connection task for the dispatcher built by `build`.
pub fn spawn<F, B>(url: String, build: B) -> Session<F>
where
    F: Feature + Send + 'static,
    B: FnOnce(Arc<dyn Outbound>) -> Dispatcher<F>,
{
    let (outbound, wire_rx) = ChannelOutbound::channel();
    let outbound: Arc<dyn Outbound> = outbound;
    let dispatcher = build(outbound);
    let (actions, action_rx) = actions();
    let handle = tokio::spawn(async move { run(&url, dispatcher, wire_rx, action_rx).await });
    Session { actions, handle }
}

/// Drive one connection until it closes, then hand the dispatcher back.
pub async fn run<F: Feature>(
    url: &str,
    dispatcher: Dispatcher<F>,
    wire_rx: mpsc::UnboundedReceiver<String>,
    action_rx: mpsc::UnboundedReceiver<Action<F>>,
) -> Dispatcher<F> {
    drive(url, dispatcher, wire_rx, action_rx)
        .instrument(tracing::info_span!("conn", %url))
        .await
}

async fn drive<F: Feature>(
    url: &str,
    mut dispatcher: Dispatcher<F>,
    mut wire_rx: mpsc::UnboundedReceiver<String>,
    mut action_rx: mpsc::UnboundedReceiver<Action<F>>,
) -> Dispatcher<F> {
    let ws = match connect_async(url).await {
        Ok((ws, _resp)) => ws,
        Err(e) => {
            dispatcher.on_error(&format!("connect failed: {e}"));
            reject_pending(&mut dispatcher, &mut action_rx);
            return dispatcher;
        }
    };
    let (mut ws_tx, mut ws_rx) = ws.split();

    dispatcher.on_opened();

    loop {
        tokio::select! {
            // outbound writer
            Some(frame) = wire_rx.recv() => {
                if let Err(e) = ws_tx.send(Message::Text(frame)).await {
                    dispatcher.on_error(&format!("send failed: {e}"));
                    break;
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let outcome = dispatcher.on_data(&text);
                        tracing::trace!(?outcome, "frame dispatched");
                    }
                    Some(Ok(Message::Binary(b))) => {
                        tracing::debug!(len = b.len(), "binary frame ignored");
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        dispatcher.on_closed();
                        break;
                    }
                    // ping/pong are answered by tungstenite
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        dispatcher.on_error(&format!("read failed: {e}"));
                        break;
                    }
                }
            }

            // ui actions
            Some(action) = action_rx.recv() => {
                if let Err(e) = dispatcher.act(action) {
                    tracing::warn!(error = %e, "action rejected");
                }
            }
        }
    }

    reject_pending(&mut dispatcher, &mut action_rx);
    dispatcher
}

/// Stop accepting actions and reject the ones already queued.
fn reject_pending<F: Feature>(
    dispatcher: &mut Dispatcher<F>,
    action_rx: &mut mpsc::UnboundedReceiver<Action<F>>,
) {
    action_rx.close();
    while let Ok(action) = action_rx.try_recv() {
        if let Err(e) = dispatcher.act(action) {
            tracing::warn!(error = %e, "queued action rejected");
        }
    }
}
