//! Outbound send capability.
//!
//! Models never touch the socket. They return [`Outgoing`] values; the
//! dispatcher encodes them and hands the wire text to an [`Outbound`].

use std::sync::Arc;

use tokio::sync::mpsc;

use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::{encode, Header};

/// A domain message ready to be wrapped in an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub header: Header,
    pub payload: String,
}

impl Outgoing {
    pub fn new(header: Header, payload: impl Into<String>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    /// Wire text for this message.
    pub fn encode(&self) -> Result<String> {
        encode(self.header.as_str(), &self.payload)
    }
}

/// Fire-and-forget send. No acknowledgement, no backpressure.
pub trait Outbound: Send + Sync {
    fn send(&self, frame: String) -> Result<()>;
}

/// Outbound backed by an unbounded queue drained by the transport task.
#[derive(Debug, Clone)]
pub struct ChannelOutbound {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelOutbound {
    /// Create the capability and the receiving end for the transport.
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl Outbound for ChannelOutbound {
    fn send(&self, frame: String) -> Result<()> {
        self.tx
            .send(frame)
            .map_err(|_| RoomlinkError::ConnectionClosed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use roomlink_core::error::ErrorCode;

    #[test]
    fn queued_frames_arrive_in_order() {
        let (out, mut rx) = ChannelOutbound::channel();
        out.send("a".into()).unwrap();
        out.send("b".into()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "a");
        assert_eq!(rx.try_recv().unwrap(), "b");
    }

    #[test]
    fn send_after_receiver_dropped_is_closed() {
        let (out, rx) = ChannelOutbound::channel();
        drop(rx);
        let err = out.send("a".into()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConnectionClosed);
    }

    #[test]
    fn outgoing_encodes_as_envelope() {
        let o = Outgoing::new(Header::GetCurrentToggle, "---");
        assert_eq!(
            o.encode().unwrap(),
            r#"{"header":"getCurrentToggle","payload":"---"}"#
        );
    }
}
