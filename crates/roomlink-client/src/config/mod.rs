//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use roomlink_core::error::{Result, RoomlinkError};

pub use schema::{ChatSection, ClientConfig, LightsSection, LobbySection};

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RoomlinkError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| RoomlinkError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
