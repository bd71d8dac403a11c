use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::mpsc::error::TrySendError;

use roomlink_core::error::{Result, RoomlinkError};

use super::{Endpoint, RealtimeCore};

/// Per-message context passed to services.
#[derive(Clone)]
pub struct SessionCtx {
    session: u64,
    endpoint: Endpoint,
    core: Arc<RealtimeCore>,
}

impl SessionCtx {
    pub fn new(session: u64, endpoint: Endpoint, core: Arc<RealtimeCore>) -> Self {
        Self {
            session,
            endpoint,
            core,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn core(&self) -> &RealtimeCore {
        &self.core
    }

    /// Queue a frame for the session that sent the current message.
    ///
    /// Never waits: the session's own loop is the one draining the queue.
    pub fn reply(&self, text: String) -> Result<()> {
        let conn = self
            .core
            .sessions(self.endpoint)
            .get(self.session)
            .ok_or(RoomlinkError::ConnectionClosed)?;
        conn.tx.try_send(Message::Text(text)).map_err(|e| match e {
            TrySendError::Full(_) => RoomlinkError::Internal("outbound queue full".into()),
            TrySendError::Closed(_) => RoomlinkError::ConnectionClosed,
        })
    }

    /// Fan a frame out to every session on this endpoint, sender included.
    pub fn broadcast(&self, text: &str) -> usize {
        self.core.sessions(self.endpoint).broadcast(text)
    }
}
