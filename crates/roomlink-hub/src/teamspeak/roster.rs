use std::sync::Arc;

use async_trait::async_trait;

use roomlink_core::error::Result;
use roomlink_core::protocol::payload::ChannelEntry;

use super::query::QueryClient;
use super::wire::{field, number, Record};
use crate::roster::RosterSource;

/// `client_type` of ServerQuery logins; never listed.
const QUERY_CLIENT: &str = "1";

/// Live roster read from the virtual server.
pub struct TeamSpeakRoster {
    client: Arc<QueryClient>,
    hidden: Vec<u64>,
}

impl TeamSpeakRoster {
    pub fn new(client: Arc<QueryClient>, hidden: Vec<u64>) -> Self {
        Self { client, hidden }
    }
}

#[async_trait]
impl RosterSource for TeamSpeakRoster {
    async fn snapshot(&self) -> Result<Vec<ChannelEntry>> {
        let clients = self.client.exec("clientlist").await?;
        let channels = self.client.exec("channellist").await?;
        build_roster(&channels, &clients, &self.hidden)
    }
}

/// Occupied, visible channels in server order, each with its voice clients.
pub fn build_roster(
    channels: &[Record],
    clients: &[Record],
    hidden: &[u64],
) -> Result<Vec<ChannelEntry>> {
    let mut seated = Vec::with_capacity(clients.len());
    for c in clients {
        if c.get("client_type").map(String::as_str) == Some(QUERY_CLIENT) {
            continue;
        }
        seated.push((number(c, "cid")?, field(c, "client_nickname")?));
    }

    let mut out = Vec::new();
    for ch in channels {
        let cid = number(ch, "cid")?;
        if hidden.contains(&cid) {
            continue;
        }
        let names: Vec<String> = seated
            .iter()
            .filter(|(at, _)| *at == cid)
            .map(|(_, name)| name.to_string())
            .collect();
        if names.is_empty() {
            continue;
        }
        out.push(ChannelEntry {
            channel_name: field(ch, "channel_name")?.to_string(),
            clients: names,
        });
    }
    Ok(out)
}
