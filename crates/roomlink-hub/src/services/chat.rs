use std::sync::Arc;

use async_trait::async_trait;

use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::payload::ChatMessage;
use roomlink_core::protocol::{encode, Envelope, Header};

use crate::dispatch::HubService;
use crate::realtime::SessionCtx;

/// Where accepted chat text goes.
#[async_trait]
pub trait ChatRelay: Send + Sync {
    async fn relay(&self, ctx: &SessionCtx, message: &str) -> Result<()>;
}

/// Echoes chat to every lobby session as `servermsg`.
pub struct LocalRelay;

#[async_trait]
impl ChatRelay for LocalRelay {
    async fn relay(&self, ctx: &SessionCtx, message: &str) -> Result<()> {
        let frame = encode(Header::ServerMsg.as_str(), message)?;
        let delivered = ctx.broadcast(&frame);
        tracing::debug!(delivered, "servermsg relayed");
        Ok(())
    }
}

/// Accepts `chatmessage` submissions and hands them to the relay.
///
/// Without a relay, submissions are parsed and dropped.
pub struct ChatService {
    relay: Option<Arc<dyn ChatRelay>>,
}

impl ChatService {
    pub fn new(relay: Option<Arc<dyn ChatRelay>>) -> Self {
        Self { relay }
    }
}

/// Parse a `chatmessage` payload: a JSON string whose text is itself a
/// `{ip, message, time}` object.
pub fn parse_submission(env: &Envelope) -> Result<ChatMessage> {
    let text = env.payload().as_string(Header::ChatMessage)?;
    serde_json::from_str(&text)
        .map_err(|e| RoomlinkError::shape(Header::ChatMessage.as_str(), e.to_string()))
}

#[async_trait]
impl HubService for ChatService {
    fn headers(&self) -> &'static [Header] {
        &[Header::ChatMessage]
    }

    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()> {
        let msg = parse_submission(&env)?;
        tracing::info!(session = ctx.session(), ip = %msg.ip, "chat message");

        if msg.message.trim().is_empty() {
            tracing::debug!("blank chat message skipped");
            return Ok(());
        }
        match &self.relay {
            Some(relay) => relay.relay(&ctx, &msg.message).await,
            None => {
                tracing::debug!("server messages disabled, chat dropped");
                Ok(())
            }
        }
    }
}
