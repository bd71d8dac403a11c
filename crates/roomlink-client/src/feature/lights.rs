//! Light toggle client (the `/lights/ws` endpoint).

use std::sync::Arc;

use roomlink_core::error::Result;
use roomlink_core::protocol::payload::CURRENT_TOGGLE_PLACEHOLDER;
use roomlink_core::protocol::{Header, Payload};

use crate::dispatch::{Dispatcher, Feature};
use crate::model::ToggleModel;
use crate::outbound::{Outbound, Outgoing};
use crate::render::RenderSink;

pub struct LightsClient {
    pub toggle: ToggleModel,
}

impl LightsClient {
    pub fn new(sink: Arc<dyn RenderSink>, strict: bool) -> Self {
        Self {
            toggle: ToggleModel::new(sink).strict(strict),
        }
    }

    fn apply_toggle(&mut self, payload: Payload<'_>) -> Result<()> {
        self.toggle.update(payload)
    }

    /// UI action: the user clicked the light button.
    pub fn click(&mut self) -> Result<Option<Outgoing>> {
        Ok(Some(self.toggle.toggle_local()))
    }

    pub fn dispatcher(
        self,
        outbound: Arc<dyn Outbound>,
        sink: Arc<dyn RenderSink>,
    ) -> Dispatcher<Self> {
        Dispatcher::new(self, outbound, sink).route(Header::Toggle, Self::apply_toggle)
    }
}

impl Feature for LightsClient {
    /// Draw whatever is known and ask the server for the real state.
    fn on_open(&mut self) -> Vec<Outgoing> {
        self.toggle.render();
        vec![Outgoing::new(
            Header::GetCurrentToggle,
            CURRENT_TOGGLE_PLACEHOLDER,
        )]
    }
}
