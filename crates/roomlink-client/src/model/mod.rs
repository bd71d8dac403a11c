//! Client state models.
//!
//! Each model owns its state exclusively and pushes a computed view into the
//! render sink it was constructed with after every change.

pub mod chat;
pub mod roster;
pub mod toggle;

pub use chat::{ChatEntry, ChatModel};
pub use roster::{rank, Channel, RosterModel};
pub use toggle::{ToggleModel, ToggleState};
