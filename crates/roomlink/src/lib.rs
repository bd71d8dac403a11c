//! Top-level facade crate for roomlink.
//!
//! Re-exports the protocol core, the client library and the hub library so
//! users can depend on a single crate.

pub mod core {
    pub use roomlink_core::*;
}

pub mod client {
    pub use roomlink_client::*;
}

pub mod hub {
    pub use roomlink_hub::*;
}
