//! Roster + chat client (the `/ws` endpoint).

use std::sync::Arc;

use roomlink_core::error::Result;
use roomlink_core::protocol::{Header, Payload};

use crate::dispatch::{Dispatcher, Feature};
use crate::model::{ChatModel, RosterModel};
use crate::outbound::{Outbound, Outgoing};
use crate::render::RenderSink;

pub struct LobbyClient {
    pub roster: RosterModel,
    pub chat: ChatModel,
}

impl LobbyClient {
    pub fn new(sink: Arc<dyn RenderSink>, max_chat_entries: Option<usize>) -> Self {
        Self {
            roster: RosterModel::new(Arc::clone(&sink)),
            chat: ChatModel::with_cap(sink, max_chat_entries),
        }
    }

    fn apply_roster(&mut self, payload: Payload<'_>) -> Result<()> {
        self.roster.update(payload)
    }

    fn apply_server_line(&mut self, payload: Payload<'_>) -> Result<()> {
        self.chat.receive(payload)
    }

    /// UI action: the user submitted a chat line.
    pub fn submit_chat(&mut self, text: &str) -> Result<Option<Outgoing>> {
        self.chat.submit(text)
    }

    /// Dispatcher with the lobby routes registered.
    pub fn dispatcher(
        self,
        outbound: Arc<dyn Outbound>,
        sink: Arc<dyn RenderSink>,
    ) -> Dispatcher<Self> {
        Dispatcher::new(self, outbound, sink)
            .route(Header::ClientList, Self::apply_roster)
            .route(Header::ServerMsg, Self::apply_server_line)
    }
}

impl Feature for LobbyClient {}
