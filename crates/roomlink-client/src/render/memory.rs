use std::sync::Mutex;

use super::{RenderSink, RosterView, ToggleView};

/// Everything a [`MemorySink`] has been asked to draw.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// Latest roster view, if any was rendered.
    pub roster: Option<RosterView>,
    /// Number of roster renders (full replacements).
    pub roster_renders: usize,
    /// Transcript lines in append order.
    pub transcript: Vec<String>,
    /// Latest toggle view, if any was rendered.
    pub toggle: Option<ToggleView>,
    /// Set once the connection closed.
    pub actions_disabled: bool,
}

/// Headless sink that keeps the rendered state in memory.
///
/// Used by tests and by embedders that draw on their own schedule.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<Rendered>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current rendered state.
    pub fn snapshot(&self) -> Rendered {
        match self.inner.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn with(&self, f: impl FnOnce(&mut Rendered)) {
        match self.inner.lock() {
            Ok(mut g) => f(&mut g),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl RenderSink for MemorySink {
    fn render_roster(&self, view: &RosterView) {
        self.with(|r| {
            r.roster = Some(view.clone());
            r.roster_renders += 1;
        });
    }

    fn append_transcript(&self, line: &str) {
        self.with(|r| r.transcript.push(line.to_string()));
    }

    fn render_toggle(&self, view: &ToggleView) {
        self.with(|r| r.toggle = Some(view.clone()));
    }

    fn disable_actions(&self) {
        self.with(|r| r.actions_disabled = true);
    }
}
