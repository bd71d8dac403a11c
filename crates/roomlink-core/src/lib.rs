//! roomlink core: transport-agnostic envelope protocol and error types.
//!
//! This crate defines the wire-level contracts shared by the browser-style
//! clients and the hub server: the `{header, payload}` envelope, the closed set
//! of header tags, the payload shapes that ride inside them, and the error
//! surface. It carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed input is
//! always reported as `RoomlinkError` so a bad frame can never take a client
//! or the hub down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, RoomlinkError};
