//! Shared application state for the hub.
//!
//! Wires the realtime core, one dispatcher per endpoint, the built-in
//! services, the roster source and the chat relay. With TeamSpeak enabled
//! the roster and relay come from the ServerQuery backend.

use std::sync::Arc;

use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::{Direction, Header};

use crate::config::HubConfig;
use crate::dispatch::Dispatcher;
use crate::realtime::{Endpoint, RealtimeCore};
use crate::roster::{RosterSource, StaticRoster};
use crate::services::{ChatRelay, ChatService, LightsService, LocalRelay};
use crate::teamspeak::{QueryClient, TeamSpeakRelay, TeamSpeakRoster};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    realtime: Arc<RealtimeCore>,
    lobby: Arc<Dispatcher>,
    lights: Arc<Dispatcher>,
}

struct AppStateInner {
    cfg: HubConfig,
    roster: Arc<dyn RosterSource>,
}

impl AppState {
    /// Build state with the roster and relay chosen by config.
    pub fn new(cfg: HubConfig) -> Result<Self> {
        if cfg.teamspeak.enabled {
            let client = Arc::new(QueryClient::new(cfg.teamspeak.clone()));
            let roster = Arc::new(TeamSpeakRoster::new(
                Arc::clone(&client),
                cfg.roster.hidden_channels.clone(),
            ));
            let relay: Arc<dyn ChatRelay> = Arc::new(TeamSpeakRelay::new(client));
            return Self::build(cfg, roster, Some(relay));
        }
        let roster = Arc::new(StaticRoster::from_config(
            &cfg.roster.channels,
            &cfg.roster.hidden_channels,
        ));
        Self::with_roster(cfg, roster)
    }

    /// Build state around a custom roster source; chat uses the local relay.
    pub fn with_roster(cfg: HubConfig, roster: Arc<dyn RosterSource>) -> Result<Self> {
        let relay: Option<Arc<dyn ChatRelay>> = if cfg.server_messages.enabled {
            Some(Arc::new(LocalRelay))
        } else {
            None
        };
        Self::build(cfg, roster, relay)
    }

    fn build(
        cfg: HubConfig,
        roster: Arc<dyn RosterSource>,
        relay: Option<Arc<dyn ChatRelay>>,
    ) -> Result<Self> {
        cfg.validate()?;

        let realtime = Arc::new(RealtimeCore::new());

        let lobby = Dispatcher::new();
        lobby.register(Arc::new(ChatService::new(relay)));

        let lights = Dispatcher::new();
        lights.register(Arc::new(LightsService::new(&cfg.lights.initial)));

        // every inbound header must land on exactly one endpoint
        for h in Header::ALL
            .iter()
            .filter(|h| h.direction() == Direction::Outbound)
        {
            let served = lobby.registered_headers().contains(h)
                || lights.registered_headers().contains(h);
            if !served {
                return Err(RoomlinkError::Internal(format!(
                    "no hub service for header {h}"
                )));
            }
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, roster }),
            realtime,
            lobby: Arc::new(lobby),
            lights: Arc::new(lights),
        })
    }

    pub fn cfg(&self) -> &HubConfig {
        &self.inner.cfg
    }

    pub fn roster(&self) -> Arc<dyn RosterSource> {
        Arc::clone(&self.inner.roster)
    }

    pub fn realtime(&self) -> Arc<RealtimeCore> {
        Arc::clone(&self.realtime)
    }

    pub fn dispatcher(&self, endpoint: Endpoint) -> Arc<Dispatcher> {
        match endpoint {
            Endpoint::Lobby => Arc::clone(&self.lobby),
            Endpoint::Lights => Arc::clone(&self.lights),
        }
    }
}
