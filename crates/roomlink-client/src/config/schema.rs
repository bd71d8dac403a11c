use serde::Deserialize;
use roomlink_core::error::{Result, RoomlinkError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub lobby: LobbySection,

    #[serde(default)]
    pub lights: LightsSection,

    #[serde(default)]
    pub chat: ChatSection,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoomlinkError::UnsupportedVersion);
        }
        if !self.lobby.enabled && !self.lights.enabled {
            return Err(RoomlinkError::BadConfig(
                "at least one of lobby/lights must be enabled".into(),
            ));
        }
        if self.lobby.enabled {
            validate_url("lobby.url", &self.lobby.url)?;
        }
        if self.lights.enabled {
            validate_url("lights.url", &self.lights.url)?;
        }
        self.chat.validate()?;
        Ok(())
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        Ok(())
    } else {
        Err(RoomlinkError::BadConfig(format!(
            "{field} must start with ws:// or wss://"
        )))
    }
}

/// Roster + chat endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LobbySection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_lobby_url")]
    pub url: String,
}

impl Default for LobbySection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_lobby_url(),
        }
    }
}

/// Light toggle endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightsSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_lights_url")]
    pub url: String,

    /// Reject light states other than On/Off instead of showing them.
    #[serde(default)]
    pub strict: bool,
}

impl Default for LightsSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_lights_url(),
            strict: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ChatSection {
    /// Transcript cap; unbounded when unset.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

impl ChatSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == Some(0) {
            return Err(RoomlinkError::BadConfig(
                "chat.max_entries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
fn default_lobby_url() -> String {
    "ws://127.0.0.1:8080/ws".into()
}
fn default_lights_url() -> String {
    "ws://127.0.0.1:8080/lights/ws".into()
}
