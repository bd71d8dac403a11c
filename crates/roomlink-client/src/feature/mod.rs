//! Feature clients, one per server endpoint.

pub mod lights;
pub mod lobby;

pub use lights::LightsClient;
pub use lobby::LobbyClient;
