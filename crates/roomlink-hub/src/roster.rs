//! Roster snapshots for lobby sessions.
//!
//! A `RosterSource` produces the channel list; the hub pushes it to each new
//! lobby session and then periodically to all of them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};

use roomlink_core::error::Result;
use roomlink_core::protocol::payload::ChannelEntry;
use roomlink_core::protocol::{encode_value, Header};

use crate::config::ChannelConfig;
use crate::realtime::{Endpoint, RealtimeCore};

/// Where roster snapshots come from.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<ChannelEntry>>;
}

/// Fixed roster taken from config.
pub struct StaticRoster {
    channels: Vec<ChannelEntry>,
}

impl StaticRoster {
    pub fn new(channels: Vec<ChannelEntry>) -> Self {
        Self { channels }
    }

    /// Channels whose id is listed in `hidden` are left out.
    pub fn from_config(channels: &[ChannelConfig], hidden: &[u64]) -> Self {
        Self::new(
            channels
                .iter()
                .filter(|c| !c.id.is_some_and(|id| hidden.contains(&id)))
                .map(|c| ChannelEntry {
                    channel_name: c.name.clone(),
                    clients: c.clients.clone(),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl RosterSource for StaticRoster {
    async fn snapshot(&self) -> Result<Vec<ChannelEntry>> {
        Ok(self.channels.clone())
    }
}

/// Build the `clientlist` frame for the current snapshot.
///
/// An empty roster goes out as `null`. A failing source sends the envelope
/// without a payload, which clients render as an error.
pub async fn snapshot_frame(source: &dyn RosterSource) -> Result<String> {
    match source.snapshot().await {
        Ok(channels) if channels.is_empty() => {
            encode_value(Header::ClientList.as_str(), &Option::<Vec<ChannelEntry>>::None)
        }
        Ok(channels) => encode_value(Header::ClientList.as_str(), &channels),
        Err(e) => {
            tracing::warn!(error = %e, "roster source failed");
            Ok(serde_json::json!({ "header": Header::ClientList.as_str() }).to_string())
        }
    }
}

/// Periodically push the roster to every lobby session.
pub fn spawn_push(
    core: Arc<RealtimeCore>,
    source: Arc<dyn RosterSource>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = time::interval(every);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            if core.sessions(Endpoint::Lobby).is_empty() {
                continue;
            }
            match snapshot_frame(source.as_ref()).await {
                Ok(frame) => {
                    let delivered = core.sessions(Endpoint::Lobby).broadcast(&frame);
                    tracing::debug!(delivered, "roster pushed");
                }
                Err(e) => tracing::warn!(error = %e, "roster frame encode failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;
    use axum::extract::ws::Message;
    use roomlink_core::error::RoomlinkError;
    use tokio::sync::mpsc;

    use crate::realtime::Connection;

    struct Broken;

    #[async_trait]
    impl RosterSource for Broken {
        async fn snapshot(&self) -> Result<Vec<ChannelEntry>> {
            Err(RoomlinkError::Internal("backend down".into()))
        }
    }

    fn channel(id: Option<u64>, name: &str, clients: &[&str]) -> ChannelConfig {
        ChannelConfig {
            id,
            name: name.into(),
            clients: clients.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn empty_roster_is_null() {
        let frame = snapshot_frame(&StaticRoster::new(vec![])).await.unwrap();
        assert_eq!(frame, r#"{"header":"clientlist","payload":null}"#);
    }

    #[tokio::test]
    async fn channels_use_wire_field_names() {
        let src = StaticRoster::from_config(&[channel(None, "Lobby", &["alice"])], &[]);
        let frame = snapshot_frame(&src).await.unwrap();
        assert_eq!(
            frame,
            r#"{"header":"clientlist","payload":[{"ChannelName":"Lobby","Clients":["alice"]}]}"#
        );
    }

    #[tokio::test]
    async fn hidden_channel_ids_are_left_out() {
        let src = StaticRoster::from_config(
            &[
                channel(Some(1), "Lobby", &["alice"]),
                channel(Some(98), "Back Office", &["carol"]),
                channel(None, "Unnumbered", &["dave"]),
            ],
            &[98],
        );
        let names: Vec<_> = src
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.channel_name)
            .collect();
        assert_eq!(names, vec!["Lobby", "Unnumbered"]);
    }

    #[tokio::test]
    async fn failing_source_omits_payload() {
        let frame = snapshot_frame(&Broken).await.unwrap();
        assert_eq!(frame, r#"{"header":"clientlist"}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn push_repeats_every_period() {
        let core = Arc::new(RealtimeCore::new());
        let (tx, mut rx) = mpsc::channel(8);
        core.sessions(Endpoint::Lobby).insert(Connection { tx });

        let src = Arc::new(StaticRoster::from_config(&[channel(None, "Lobby", &["alice"])], &[]));
        let every = Duration::from_secs(5);
        let push = spawn_push(Arc::clone(&core), src, every);

        // first tick fires immediately
        let Some(Message::Text(first)) = rx.recv().await else {
            panic!("expected a text frame");
        };
        assert!(first.contains("clientlist"));
        assert!(rx.try_recv().is_err());

        time::advance(every + Duration::from_millis(1)).await;
        let Some(Message::Text(second)) = rx.recv().await else {
            panic!("expected a second text frame");
        };
        assert_eq!(first, second);

        push.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn push_skips_an_empty_lobby() {
        let core = Arc::new(RealtimeCore::new());
        let src = Arc::new(StaticRoster::new(vec![]));
        let push = spawn_push(Arc::clone(&core), src, Duration::from_secs(5));

        time::advance(Duration::from_secs(11)).await;

        let (tx, mut rx) = mpsc::channel(8);
        core.sessions(Endpoint::Lobby).insert(Connection { tx });
        assert!(rx.try_recv().is_err());

        time::advance(Duration::from_secs(5)).await;
        assert!(matches!(rx.recv().await, Some(Message::Text(_))));

        push.abort();
    }
}
