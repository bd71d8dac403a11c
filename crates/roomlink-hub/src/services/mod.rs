//! Built-in hub services.

pub mod chat;
pub mod lights;

pub use chat::{ChatRelay, ChatService, LocalRelay};
pub use lights::LightsService;
