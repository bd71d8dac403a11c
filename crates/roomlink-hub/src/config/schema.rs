use serde::Deserialize;
use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::payload::{LIGHT_OFF, LIGHT_ON};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    pub version: u32,

    #[serde(default)]
    pub hub: HubSection,

    #[serde(default)]
    pub roster: RosterSection,

    #[serde(default)]
    pub server_messages: ServerMessagesSection,

    #[serde(default)]
    pub lights: LightsSection,

    #[serde(default)]
    pub teamspeak: TeamSpeakSection,
}

impl HubConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoomlinkError::UnsupportedVersion);
        }

        self.hub.validate()?;
        self.roster.validate()?;
        self.lights.validate()?;
        self.teamspeak.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Per-session outbound queue depth.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for HubSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl HubSection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(RoomlinkError::BadConfig(
                "hub.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(RoomlinkError::BadConfig(
                "hub.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(RoomlinkError::BadConfig(
                "hub.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(1..=65536).contains(&self.queue_capacity) {
            return Err(RoomlinkError::BadConfig(
                "hub.queue_capacity must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_queue_capacity() -> usize {
    1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterSection {
    /// Push snapshots at all (on connect and periodically).
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How often the roster snapshot is pushed to lobby sessions.
    #[serde(default = "default_roster_interval_ms")]
    pub interval_ms: u64,

    /// Channel ids never shown, whatever the roster source.
    #[serde(default)]
    pub hidden_channels: Vec<u64>,

    /// Static roster, used when TeamSpeak is disabled.
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

impl Default for RosterSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_ms: default_roster_interval_ms(),
            hidden_channels: Vec::new(),
            channels: Vec::new(),
        }
    }
}

impl RosterSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=600000).contains(&self.interval_ms) {
            return Err(RoomlinkError::BadConfig(
                "roster.interval_ms must be between 1000 and 600000".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for ch in &self.channels {
            if !seen.insert(ch.name.as_str()) {
                return Err(RoomlinkError::BadConfig(format!(
                    "roster.channels: duplicate channel {:?}",
                    ch.name
                )));
            }
        }
        Ok(())
    }
}

fn default_roster_interval_ms() -> u64 {
    5000
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerMessagesSection {
    /// Produce `servermsg` frames (local relay or TeamSpeak text events).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for ServerMessagesSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Optional id, matched against `roster.hidden_channels`.
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub clients: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightsSection {
    #[serde(default = "default_initial_light")]
    pub initial: String,
}

impl Default for LightsSection {
    fn default() -> Self {
        Self {
            initial: default_initial_light(),
        }
    }
}

impl LightsSection {
    pub fn validate(&self) -> Result<()> {
        if self.initial != LIGHT_ON && self.initial != LIGHT_OFF {
            return Err(RoomlinkError::BadConfig(
                "lights.initial must be \"On\" or \"Off\"".into(),
            ));
        }
        Ok(())
    }
}

fn default_initial_light() -> String {
    LIGHT_ON.into()
}

/// TeamSpeak ServerQuery backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamSpeakSection {
    #[serde(default)]
    pub enabled: bool,

    /// ServerQuery `host:port`.
    #[serde(default = "default_ts_addr")]
    pub addr: String,

    #[serde(default = "default_ts_username")]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Virtual server selected with `use`.
    #[serde(default = "default_ts_server_id")]
    pub server_id: u32,

    /// Keepalive period on the text-event connection.
    #[serde(default = "default_ts_keepalive_ms")]
    pub keepalive_ms: u64,
}

impl Default for TeamSpeakSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_ts_addr(),
            username: default_ts_username(),
            password: String::new(),
            server_id: default_ts_server_id(),
            keepalive_ms: default_ts_keepalive_ms(),
        }
    }
}

impl TeamSpeakSection {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.addr.trim().is_empty() {
            return Err(RoomlinkError::BadConfig("teamspeak.addr must not be empty".into()));
        }
        if self.username.trim().is_empty() {
            return Err(RoomlinkError::BadConfig(
                "teamspeak.username must not be empty".into(),
            ));
        }
        if self.server_id == 0 {
            return Err(RoomlinkError::BadConfig(
                "teamspeak.server_id must be at least 1".into(),
            ));
        }
        if !(1000..=300000).contains(&self.keepalive_ms) {
            return Err(RoomlinkError::BadConfig(
                "teamspeak.keepalive_ms must be between 1000 and 300000".into(),
            ));
        }
        Ok(())
    }
}

fn default_ts_addr() -> String {
    "127.0.0.1:10011".into()
}
fn default_ts_username() -> String {
    "serveradmin".into()
}
fn default_ts_server_id() -> u32 {
    1
}
fn default_ts_keepalive_ms() -> u64 {
    60000
}
