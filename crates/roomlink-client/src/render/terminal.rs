use std::io::{self, Write};

use super::{RenderSink, RosterView, ToggleView, ROSTER_EMPTY_NOTICE, ROSTER_ERROR_NOTICE};

/// Line-oriented sink that draws to stdout.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, text: &str) {
        let mut out = io::stdout().lock();
        // a closed stdout does not affect the connection
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

/// Format a roster view as indented text.
pub fn format_roster(view: &RosterView) -> String {
    match view {
        RosterView::Error => format!("[roster] {ROSTER_ERROR_NOTICE}\n"),
        RosterView::EmptyNotice => format!("[roster] {ROSTER_EMPTY_NOTICE}\n"),
        RosterView::Listing(channels) => {
            let mut s = String::from("[roster]\n");
            for ch in channels {
                s.push_str(&format!("  {} ({})\n", ch.name, ch.occupant_count()));
                for who in &ch.occupants {
                    s.push_str(&format!("    - {who}\n"));
                }
            }
            s
        }
    }
}

impl RenderSink for TerminalSink {
    fn render_roster(&self, view: &RosterView) {
        self.emit(&format_roster(view));
    }

    fn append_transcript(&self, line: &str) {
        self.emit(&format!("[chat] {line}\n"));
    }

    fn render_toggle(&self, view: &ToggleView) {
        self.emit(&format!(
            "[light] {} ({} on {})\n",
            view.label,
            view.foreground.as_str(),
            view.background.as_str()
        ));
    }

    fn disable_actions(&self) {
        self.emit("[conn] connection closed; restart to reconnect\n");
    }
}
