//! Channel roster model.
//!
//! The server pushes the whole roster on every update; the previous snapshot
//! is discarded, never merged.
//!
//! Display order comes from two stable sorts applied in sequence: first by
//! channel name (descending), then by occupant count (descending). The second
//! pass dominates, so the name order only survives between channels with the
//! same number of occupants. This is not the same as a single composite
//! comparator and must stay two passes.

use std::sync::Arc;

use roomlink_core::error::Result;
use roomlink_core::protocol::payload::ChannelEntry;
use roomlink_core::protocol::{Header, Payload};

use crate::render::{ChannelView, RenderSink, RosterView};

/// A channel and its occupants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub occupants: Vec<String>,
}

impl From<ChannelEntry> for Channel {
    fn from(e: ChannelEntry) -> Self {
        Self {
            name: e.channel_name,
            occupants: e.clients,
        }
    }
}

/// Rank channels for display.
///
/// Occupants end up sorted ascending (byte order, case-sensitive) with
/// duplicates collapsed.
pub fn rank(mut channels: Vec<Channel>) -> Vec<Channel> {
    for ch in &mut channels {
        ch.occupants.sort();
        ch.occupants.dedup();
    }
    channels.sort_by(|a, b| b.name.cmp(&a.name));
    channels.sort_by(|a, b| b.occupants.len().cmp(&a.occupants.len()));
    channels
}

pub struct RosterModel {
    view: Option<RosterView>,
    sink: Arc<dyn RenderSink>,
}

impl RosterModel {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self { view: None, sink }
    }

    /// Latest rendered view, `None` before the first snapshot.
    pub fn view(&self) -> Option<&RosterView> {
        self.view.as_ref()
    }

    /// Apply a `clientlist` payload.
    ///
    /// A malformed snapshot renders the error placeholder and is also
    /// reported back so the dispatcher can log it.
    pub fn update(&mut self, payload: Payload<'_>) -> Result<()> {
        let (view, res) = match payload {
            Payload::Absent => (RosterView::Error, Ok(())),
            Payload::Null => (RosterView::EmptyNotice, Ok(())),
            Payload::Value(_) => match payload.parse::<Vec<ChannelEntry>>(Header::ClientList) {
                Ok(entries) => {
                    let ranked = rank(entries.into_iter().map(Channel::from).collect());
                    let listing = ranked
                        .into_iter()
                        .map(|c| ChannelView {
                            name: c.name,
                            occupants: c.occupants,
                        })
                        .collect();
                    (RosterView::Listing(listing), Ok(()))
                }
                Err(e) => (RosterView::Error, Err(e)),
            },
        };
        self.sink.render_roster(&view);
        self.view = Some(view);
        res
    }
}
