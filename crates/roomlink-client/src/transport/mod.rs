//! Transport layer (WebSocket client).
//!
//! Translates socket events into the dispatcher's lifecycle signals and drains
//! the outbound queue.

pub mod ws;

pub use ws::{actions, run, spawn, Action, ActionSender, Session};
