//! TeamSpeak 3 ServerQuery backend.
//!
//! - `TeamSpeakRoster`: live channel roster for `clientlist`
//! - `TeamSpeakRelay`: lobby chat forwarded as a server-wide message
//! - `spawn_listener`: server text events relayed as `servermsg`

pub mod chat;
pub mod notify;
pub mod query;
pub mod roster;
pub mod wire;

pub use chat::TeamSpeakRelay;
pub use notify::spawn_listener;
pub use query::{QueryClient, QueryConn};
pub use roster::TeamSpeakRoster;
