//! Chat transcript model.

use std::collections::VecDeque;
use std::sync::Arc;

use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::payload::ChatMessage;
use roomlink_core::protocol::{Header, Payload};

use crate::outbound::Outgoing;
use crate::render::RenderSink;

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub text: String,
}

/// Append-only transcript.
///
/// Unbounded unless a cap is set, in which case the oldest entries are
/// evicted from the model (the sink keeps whatever it already drew).
pub struct ChatModel {
    transcript: VecDeque<ChatEntry>,
    max_entries: Option<usize>,
    sink: Arc<dyn RenderSink>,
}

impl ChatModel {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self::with_cap(sink, None)
    }

    pub fn with_cap(sink: Arc<dyn RenderSink>, max_entries: Option<usize>) -> Self {
        Self {
            transcript: VecDeque::new(),
            max_entries,
            sink,
        }
    }

    pub fn transcript(&self) -> impl Iterator<Item = &ChatEntry> {
        self.transcript.iter()
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    /// Submit a line typed by the user.
    ///
    /// Whitespace-only input is a no-op. Otherwise the trimmed text is echoed
    /// into the transcript and returned as a `chatmessage` to send.
    pub fn submit(&mut self, text: &str) -> Result<Option<Outgoing>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let body = serde_json::to_string(&ChatMessage::outgoing(text))
            .map_err(|e| RoomlinkError::Internal(format!("chat encode failed: {e}")))?;

        self.push(text.to_string());
        Ok(Some(Outgoing::new(Header::ChatMessage, body)))
    }

    /// Apply a `servermsg` payload. Text is appended verbatim.
    pub fn receive(&mut self, payload: Payload<'_>) -> Result<()> {
        let text = match payload {
            Payload::Value(raw) => match serde_json::from_str::<String>(raw.get()) {
                Ok(s) => s,
                // non-string payloads are shown as their JSON text
                Err(_) => raw.get().to_string(),
            },
            Payload::Absent | Payload::Null => {
                return Err(RoomlinkError::shape(
                    Header::ServerMsg.as_str(),
                    "missing message text",
                ))
            }
        };
        self.push(text);
        Ok(())
    }

    fn push(&mut self, text: String) {
        self.sink.append_transcript(&text);
        self.transcript.push_back(ChatEntry { text });
        if let Some(cap) = self.max_entries {
            while self.transcript.len() > cap {
                self.transcript.pop_front();
            }
        }
    }
}
