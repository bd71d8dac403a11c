//! Light toggle model.
//!
//! Local clicks update the view optimistically; server `toggle` pushes
//! overwrite it. Whichever write lands last wins.

use std::sync::Arc;

use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::payload::{LIGHT_OFF, LIGHT_ON};
use roomlink_core::protocol::{Header, Payload};

use crate::outbound::Outgoing;
use crate::render::{LightColor, RenderSink, ToggleView};

/// Label shown before the first server confirmation.
pub const UNKNOWN_LABEL: &str = "?";

/// Displayed light state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleState {
    /// Not yet initialized by the server or the user.
    Unknown,
    On,
    Off,
    /// A literal outside On/Off, displayed as-is.
    Other(String),
}

impl ToggleState {
    pub fn from_literal(s: &str) -> Self {
        match s {
            LIGHT_ON => ToggleState::On,
            LIGHT_OFF => ToggleState::Off,
            other => ToggleState::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ToggleState::Unknown => UNKNOWN_LABEL,
            ToggleState::On => LIGHT_ON,
            ToggleState::Off => LIGHT_OFF,
            ToggleState::Other(s) => s,
        }
    }

    /// View for this state: green only when the label reads "On".
    pub fn view(&self) -> ToggleView {
        let label = self.label();
        let background = if label == LIGHT_ON {
            LightColor::Green
        } else {
            LightColor::Black
        };
        ToggleView {
            label: label.to_string(),
            background,
            foreground: LightColor::White,
        }
    }
}

pub struct ToggleModel {
    state: ToggleState,
    strict: bool,
    sink: Arc<dyn RenderSink>,
}

impl ToggleModel {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self {
            state: ToggleState::Unknown,
            strict: false,
            sink,
        }
    }

    /// Reject literals other than On/Off instead of displaying them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn state(&self) -> &ToggleState {
        &self.state
    }

    /// Redraw the current state.
    pub fn render(&self) {
        self.sink.render_toggle(&self.state.view());
    }

    /// Apply a `toggle` payload. Bad payloads leave the state untouched.
    pub fn update(&mut self, payload: Payload<'_>) -> Result<()> {
        let literal = payload.as_string(Header::Toggle)?;
        let next = ToggleState::from_literal(&literal);
        if self.strict {
            if let ToggleState::Other(s) = &next {
                return Err(RoomlinkError::shape(
                    Header::Toggle.as_str(),
                    format!("unknown light state {s:?}"),
                ));
            }
        }
        self.state = next;
        self.render();
        Ok(())
    }

    /// User clicked the toggle: flip the displayed label and request it.
    pub fn toggle_local(&mut self) -> Outgoing {
        let next = if self.state.label() == LIGHT_ON {
            ToggleState::Off
        } else {
            ToggleState::On
        };
        self.state = next;
        self.render();
        Outgoing::new(Header::ToggleLight, self.state.label())
    }
}
