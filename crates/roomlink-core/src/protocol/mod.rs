//! Wire protocol: JSON `{header, payload}` envelopes.
//!
//! - `envelope`: encode/decode, with the payload kept as raw JSON so each
//!   receiving model validates its own shape.
//! - `header`: the closed, versionless tag set.
//! - `payload`: typed shapes carried inside the envelopes.
//!
//! All decoders are panic-free: malformed input is reported as
//! `RoomlinkError` instead of panicking.

pub mod envelope;
pub mod header;
pub mod payload;

pub use envelope::{decode, encode, encode_value, Envelope, Payload};
pub use header::{Direction, Header};
