//! Hub dispatcher: routes decoded envelopes to registered services.

pub mod dispatcher;

pub use dispatcher::{Dispatcher, HubService};
