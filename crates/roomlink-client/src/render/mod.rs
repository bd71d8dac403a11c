//! Render sink boundary.
//!
//! Models compute view values and hand them to a [`RenderSink`]; the sink owns
//! whatever actually draws them (a terminal here, a DOM elsewhere). Views are
//! always complete replacements except the chat transcript, which is
//! append-only.

mod memory;
mod terminal;

pub use memory::{MemorySink, Rendered};
pub use terminal::TerminalSink;

/// Text shown when a roster snapshot could not be read.
pub const ROSTER_ERROR_NOTICE: &str = "Error while loading client list";
/// Text shown when the server reports nobody online.
pub const ROSTER_EMPTY_NOTICE: &str = "No one is currently online";

/// Rendered roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterView {
    /// Snapshot missing or malformed.
    Error,
    /// Server reported no one online.
    EmptyNotice,
    /// Ranked channels (possibly zero of them).
    Listing(Vec<ChannelView>),
}

/// One ranked channel with its sorted occupants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelView {
    pub name: String,
    pub occupants: Vec<String>,
}

impl ChannelView {
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }
}

/// Colors used by the light toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightColor {
    Green,
    Black,
    White,
}

impl LightColor {
    /// CSS color keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            LightColor::Green => "green",
            LightColor::Black => "black",
            LightColor::White => "white",
        }
    }
}

/// Rendered light toggle control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub label: String,
    pub background: LightColor,
    pub foreground: LightColor,
}

/// External UI-update boundary.
///
/// Implementations must tolerate being called from the connection task; all
/// calls for one connection arrive strictly one at a time.
pub trait RenderSink: Send + Sync {
    /// Replace the roster view.
    fn render_roster(&self, view: &RosterView);
    /// Append one line to the transcript and scroll to it.
    fn append_transcript(&self, line: &str);
    /// Replace the light toggle view.
    fn render_toggle(&self, view: &ToggleView);
    /// Connection is gone; disable controls that would send.
    fn disable_actions(&self);
}
