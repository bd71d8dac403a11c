//! Realtime runtime for the hub: per-endpoint session registries and the
//! per-message context handed to services.

pub mod ctx;
pub mod registry;

use std::fmt;

pub use ctx::SessionCtx;
pub use registry::{Connection, SessionRegistry};

/// The two WebSocket endpoints the hub serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/ws`: roster and chat.
    Lobby,
    /// `/lights/ws`: light toggle.
    Lights,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Lobby => "lobby",
            Endpoint::Lights => "lights",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Egress engine: one registry per endpoint.
#[derive(Default)]
pub struct RealtimeCore {
    lobby: SessionRegistry,
    lights: SessionRegistry,
}

impl RealtimeCore {
    pub fn new() -> Self {
        Self {
            lobby: SessionRegistry::new(),
            lights: SessionRegistry::new(),
        }
    }

    pub fn sessions(&self, endpoint: Endpoint) -> &SessionRegistry {
        match endpoint {
            Endpoint::Lobby => &self.lobby,
            Endpoint::Lights => &self.lights,
        }
    }
}
