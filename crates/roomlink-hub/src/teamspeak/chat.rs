use std::sync::Arc;

use async_trait::async_trait;

use roomlink_core::error::Result;

use super::query::QueryClient;
use super::wire::escape;
use crate::realtime::SessionCtx;
use crate::services::ChatRelay;

/// Forwards lobby chat as a server-wide TeamSpeak text message.
///
/// Lobby sessions see it once the server echoes it back as a text event.
pub struct TeamSpeakRelay {
    client: Arc<QueryClient>,
}

impl TeamSpeakRelay {
    pub fn new(client: Arc<QueryClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatRelay for TeamSpeakRelay {
    async fn relay(&self, ctx: &SessionCtx, message: &str) -> Result<()> {
        self.client
            .exec(&format!("gm msg={}", escape(message)))
            .await?;
        tracing::debug!(session = ctx.session(), "chat forwarded to teamspeak");
        Ok(())
    }
}
