//! roomlink client library.
//!
//! Keeps UI state synchronized over one long-lived WebSocket connection per
//! feature: the dispatcher routes decoded envelopes to the roster, chat and
//! light-toggle models, and each model pushes its computed view into an
//! injected [`render::RenderSink`]. The transport is reached only through the
//! [`outbound::Outbound`] capability and the dispatcher's lifecycle methods, so
//! everything above [`transport`] runs without a network.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod dispatch;
pub mod feature;
pub mod model;
pub mod outbound;
pub mod render;
pub mod transport;
