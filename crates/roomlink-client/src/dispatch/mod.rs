//! Dispatcher module exports.
//!
//! The dispatcher owns the connection lifecycle and the header → handler
//! table; the models behind it own all UI state.

pub mod dispatcher;

pub use dispatcher::{ConnState, Dispatched, Dispatcher, Feature, Handler};
