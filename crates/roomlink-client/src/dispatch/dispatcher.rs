use std::collections::HashMap;
use std::sync::Arc;

use roomlink_core::error::{ErrorCode, Result, RoomlinkError};
use roomlink_core::protocol::{decode, Header, Payload};

use crate::outbound::{Outbound, Outgoing};
use crate::render::RenderSink;

/// Model update bound to one header.
pub type Handler<F> = fn(&mut F, Payload<'_>) -> Result<()>;

/// A feature client: the models behind one connection.
pub trait Feature {
    /// Messages to send as soon as the connection opens.
    fn on_open(&mut self) -> Vec<Outgoing> {
        Vec::new()
    }
}

/// Connection lifecycle as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Open,
    /// Terminal.
    Closed,
}

/// What happened to one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Routed to the bound handler, which accepted it.
    Handled(Header),
    /// Tag outside the known set.
    UnknownHeader,
    /// Known tag, but this feature registered no handler for it.
    Unrouted(Header),
    /// Frame or payload rejected; nothing changed.
    Dropped(ErrorCode),
    /// Arrived while the connection was not open.
    Inactive,
}

/// Routes decoded envelopes to the feature's handlers and gates outbound
/// actions on the connection state.
pub struct Dispatcher<F> {
    state: ConnState,
    feature: F,
    handlers: HashMap<Header, Handler<F>>,
    outbound: Arc<dyn Outbound>,
    sink: Arc<dyn RenderSink>,
}

impl<F: Feature> Dispatcher<F> {
    pub fn new(feature: F, outbound: Arc<dyn Outbound>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            state: ConnState::Connecting,
            feature,
            handlers: HashMap::new(),
            outbound,
            sink,
        }
    }

    /// Bind a handler to a header. A later binding replaces an earlier one.
    pub fn route(mut self, header: Header, handler: Handler<F>) -> Self {
        self.handlers.insert(header, handler);
        self
    }

    pub fn registered_headers(&self) -> Vec<Header> {
        self.handlers.keys().copied().collect()
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn feature(&self) -> &F {
        &self.feature
    }

    /// Transport opened.
    pub fn on_opened(&mut self) {
        if self.state != ConnState::Connecting {
            tracing::debug!(state = ?self.state, "ignoring open signal");
            return;
        }
        self.state = ConnState::Open;
        tracing::info!("connection open");

        for out in self.feature.on_open() {
            if let Err(e) = self.send(&out) {
                tracing::warn!(header = %out.header, error = %e, "initial message not sent");
            }
        }
    }

    /// Transport delivered one text frame.
    pub fn on_data(&mut self, text: &str) -> Dispatched {
        if self.state != ConnState::Open {
            tracing::debug!(state = ?self.state, "frame outside open connection dropped");
            return Dispatched::Inactive;
        }

        let env = match decode(text) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(error = %e, "undecodable frame dropped");
                return Dispatched::Dropped(e.code());
            }
        };

        let Some(header) = env.known_header() else {
            tracing::debug!(header = %env.header, "unknown header ignored");
            return Dispatched::UnknownHeader;
        };

        let Some(handler) = self.handlers.get(&header).copied() else {
            tracing::debug!(%header, "no handler for header");
            return Dispatched::Unrouted(header);
        };

        match handler(&mut self.feature, env.payload()) {
            Ok(()) => Dispatched::Handled(header),
            Err(e) => {
                tracing::warn!(%header, error = %e, "payload rejected");
                Dispatched::Dropped(e.code())
            }
        }
    }

    /// Transport closed. Permanent.
    pub fn on_closed(&mut self) {
        self.close("closed by peer");
    }

    /// Transport failed. Permanent.
    pub fn on_error(&mut self, reason: &str) {
        self.close(reason);
    }

    fn close(&mut self, reason: &str) {
        if self.state == ConnState::Closed {
            return;
        }
        self.state = ConnState::Closed;
        tracing::info!(reason, "connection closed");
        self.sink.disable_actions();
    }

    /// Run a user action against the feature and send what it produces.
    ///
    /// Rejected before the connection opens and after it closes; the action
    /// is not run in either case.
    pub fn act<A>(&mut self, action: A) -> Result<()>
    where
        A: FnOnce(&mut F) -> Result<Option<Outgoing>>,
    {
        match self.state {
            ConnState::Connecting => return Err(RoomlinkError::NotOpen),
            ConnState::Closed => return Err(RoomlinkError::ConnectionClosed),
            ConnState::Open => {}
        }
        if let Some(out) = action(&mut self.feature)? {
            self.send(&out)?;
        }
        Ok(())
    }

    fn send(&self, out: &Outgoing) -> Result<()> {
        self.outbound.send(out.encode()?)
    }
}
