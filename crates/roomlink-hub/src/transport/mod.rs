//! Transport layer (WebSocket).

pub mod ws;
