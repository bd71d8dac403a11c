//! roomlink hub library entry.
//!
//! Serves the lobby (`/ws`: roster + chat) and lights (`/lights/ws`)
//! endpoints over the shared envelope protocol, optionally backed by a
//! TeamSpeak server. Consumed by the binary (`main.rs`) and by integration
//! tests.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod ops;
pub mod realtime;
pub mod roster;
pub mod router;
pub mod server;
pub mod services;
pub mod teamspeak;
pub mod transport;
