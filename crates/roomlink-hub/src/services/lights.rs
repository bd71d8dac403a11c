use async_trait::async_trait;
use tokio::sync::RwLock;

use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::payload::{LIGHT_OFF, LIGHT_ON};
use roomlink_core::protocol::{encode, Envelope, Header};

use crate::dispatch::HubService;
use crate::realtime::SessionCtx;

/// Holds the authoritative light state.
pub struct LightsService {
    current: RwLock<&'static str>,
}

impl LightsService {
    /// `initial` must be `"On"` or `"Off"`; anything else starts as `"On"`.
    pub fn new(initial: &str) -> Self {
        let initial = normalize(initial).unwrap_or(LIGHT_ON);
        Self {
            current: RwLock::new(initial),
        }
    }

    pub async fn current(&self) -> &'static str {
        *self.current.read().await
    }
}

/// Case-insensitive `on`/`off` to the canonical literal.
pub fn normalize(value: &str) -> Option<&'static str> {
    if value.eq_ignore_ascii_case("on") {
        Some(LIGHT_ON)
    } else if value.eq_ignore_ascii_case("off") {
        Some(LIGHT_OFF)
    } else {
        None
    }
}

#[async_trait]
impl HubService for LightsService {
    fn headers(&self) -> &'static [Header] {
        &[Header::ToggleLight, Header::GetCurrentToggle]
    }

    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()> {
        match env.known_header() {
            Some(Header::ToggleLight) => {
                let requested = env.payload().as_string(Header::ToggleLight)?;
                let value = normalize(&requested).ok_or_else(|| {
                    RoomlinkError::shape(
                        Header::ToggleLight.as_str(),
                        format!("expected on/off, got {requested:?}"),
                    )
                })?;

                // hold the lock across the fan-out so broadcasts keep store order
                let mut current = self.current.write().await;
                *current = value;
                let frame = encode(Header::Toggle.as_str(), value)?;
                let delivered = ctx.broadcast(&frame);
                tracing::info!(session = ctx.session(), light = value, delivered, "light toggled");
                Ok(())
            }
            Some(Header::GetCurrentToggle) => {
                let value = self.current().await;
                ctx.reply(encode(Header::Toggle.as_str(), value)?)
            }
            _ => Err(RoomlinkError::UnknownHeader(env.header.clone())),
        }
    }
}
