//! Shared error type across roomlink crates.

use thiserror::Error;

/// Stable error codes, used in logs and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Wire text is not a well-formed envelope.
    Decode,
    /// Envelope carries a tag outside the known set.
    UnknownHeader,
    /// Payload present but not shaped as its header requires.
    Shape,
    /// The connection reached its terminal state.
    ConnectionClosed,
    /// The connection has not opened yet.
    NotOpen,
    /// Configuration rejected.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Transport or server failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Decode => "DECODE",
            ErrorCode::UnknownHeader => "UNKNOWN_HEADER",
            ErrorCode::Shape => "SHAPE",
            ErrorCode::ConnectionClosed => "CONNECTION_CLOSED",
            ErrorCode::NotOpen => "NOT_OPEN",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RoomlinkError>;

/// Unified error type used by core, client and hub.
#[derive(Debug, Error)]
pub enum RoomlinkError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("unknown header: {0}")]
    UnknownHeader(String),
    #[error("bad {header} payload: {reason}")]
    Shape { header: &'static str, reason: String },
    #[error("connection closed")]
    ConnectionClosed,
    #[error("connection not open")]
    NotOpen,
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl RoomlinkError {
    /// Shape error for the given header tag.
    pub fn shape(header: &'static str, reason: impl Into<String>) -> Self {
        RoomlinkError::Shape {
            header,
            reason: reason.into(),
        }
    }

    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RoomlinkError::Decode(_) => ErrorCode::Decode,
            RoomlinkError::UnknownHeader(_) => ErrorCode::UnknownHeader,
            RoomlinkError::Shape { .. } => ErrorCode::Shape,
            RoomlinkError::ConnectionClosed => ErrorCode::ConnectionClosed,
            RoomlinkError::NotOpen => ErrorCode::NotOpen,
            RoomlinkError::BadConfig(_) => ErrorCode::BadConfig,
            RoomlinkError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            RoomlinkError::Internal(_) => ErrorCode::Internal,
        }
    }
}
