//! Payload shapes carried inside envelopes.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder payload for `getCurrentToggle`.
pub const CURRENT_TOGGLE_PLACEHOLDER: &str = "---";
/// Placeholder `ip` on outbound chat submissions.
pub const CHAT_IP_PLACEHOLDER: &str = "0.0.0.0";
/// Placeholder `time` on outbound chat submissions.
pub const CHAT_TIME_PLACEHOLDER: &str = "--:--";

/// Light state literal for "on".
pub const LIGHT_ON: &str = "On";
/// Light state literal for "off".
pub const LIGHT_OFF: &str = "Off";

/// One channel of a `clientlist` snapshot.
///
/// Field names follow the server's wire spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    #[serde(rename = "ChannelName")]
    pub channel_name: String,
    #[serde(rename = "Clients", default, deserialize_with = "nullable_list")]
    pub clients: Vec<String>,
}

// Servers may send `"Clients": null` for an unoccupied channel.
fn nullable_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
}

/// Body of a `chatmessage` submission.
///
/// Travels as JSON text embedded in the envelope's string payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub ip: String,
    pub message: String,
    pub time: String,
}

impl ChatMessage {
    /// Client-side submission with placeholder `ip`/`time`.
    pub fn outgoing(message: impl Into<String>) -> Self {
        Self {
            ip: CHAT_IP_PLACEHOLDER.to_string(),
            message: message.into(),
            time: CHAT_TIME_PLACEHOLDER.to_string(),
        }
    }
}
