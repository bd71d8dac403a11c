use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::{Envelope, Header};

use crate::realtime::SessionCtx;

/// A hub-side handler for one or more inbound headers.
#[async_trait]
pub trait HubService: Send + Sync {
    fn headers(&self) -> &'static [Header];
    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()>;
}

/// Header -> service routing for one endpoint.
#[derive(Default)]
pub struct Dispatcher {
    routes: DashMap<Header, Arc<dyn HubService>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
        }
    }

    pub fn register(&self, svc: Arc<dyn HubService>) {
        for h in svc.headers() {
            self.routes.insert(*h, Arc::clone(&svc));
        }
    }

    pub fn registered_headers(&self) -> Vec<Header> {
        self.routes.iter().map(|e| *e.key()).collect()
    }

    /// Route one envelope. Headers outside the known set, or known but not
    /// served on this endpoint, yield `UnknownHeader`.
    pub async fn dispatch(&self, ctx: SessionCtx, env: Envelope) -> Result<()> {
        let handler = env
            .known_header()
            .and_then(|h| self.routes.get(&h).map(|r| Arc::clone(r.value())))
            .ok_or_else(|| RoomlinkError::UnknownHeader(env.header.clone()))?;
        handler.handle(ctx, env).await
    }
}
