//! Hub config loader (strict parsing).

pub mod schema;

use std::fs;

use roomlink_core::error::{Result, RoomlinkError};

pub use schema::{
    ChannelConfig, HubConfig, HubSection, LightsSection, RosterSection, ServerMessagesSection,
    TeamSpeakSection,
};

pub fn load_from_file(path: &str) -> Result<HubConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RoomlinkError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<HubConfig> {
    let cfg: HubConfig = serde_yaml::from_str(s)
        .map_err(|e| RoomlinkError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
