//! Envelope codec (JSON).
//!
//! The payload is stored as `RawValue` and is never validated here; each
//! receiving model parses the shape it expects. The codec distinguishes a
//! missing payload from an explicit `null` because the roster gives those two
//! states different meanings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::error::{Result, RoomlinkError};
use crate::protocol::header::Header;

/// Decoded wire envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Tag selecting the handler. May be outside the known set.
    pub header: String,
    /// `None` when the field is missing; `Some("null")` for an explicit null.
    #[serde(rename = "payload", default, deserialize_with = "present")]
    raw_payload: Option<Box<RawValue>>,
}

fn present<'de, D>(d: D) -> std::result::Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(d).map(Some)
}

impl Envelope {
    /// Known header, or `None` for a forward-compatible unknown tag.
    pub fn known_header(&self) -> Option<Header> {
        Header::from_wire(&self.header)
    }

    /// Three-state view of the payload.
    pub fn payload(&self) -> Payload<'_> {
        match self.raw_payload.as_deref() {
            None => Payload::Absent,
            Some(raw) if raw.get().trim() == "null" => Payload::Null,
            Some(raw) => Payload::Value(raw),
        }
    }
}

/// Payload as delivered, before any shape validation.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// The `payload` field was missing.
    Absent,
    /// The `payload` field was `null`.
    Null,
    /// Any other JSON value, unparsed.
    Value(&'a RawValue),
}

impl<'a> Payload<'a> {
    /// Raw JSON text of a present payload.
    pub fn raw_text(&self) -> Option<&'a str> {
        match *self {
            Payload::Value(raw) => Some(raw.get()),
            _ => None,
        }
    }

    /// Parse a present payload, reporting a shape error for `header` otherwise.
    pub fn parse<T: DeserializeOwned>(&self, header: Header) -> Result<T> {
        match *self {
            Payload::Absent => Err(RoomlinkError::shape(header.as_str(), "payload absent")),
            Payload::Null => Err(RoomlinkError::shape(header.as_str(), "payload null")),
            Payload::Value(raw) => serde_json::from_str(raw.get())
                .map_err(|e| RoomlinkError::shape(header.as_str(), e.to_string())),
        }
    }

    /// Payload as a JSON string literal.
    pub fn as_string(&self, header: Header) -> Result<String> {
        self.parse::<String>(header)
    }
}

#[derive(Serialize)]
struct Outbound<'a, T: Serialize + ?Sized> {
    header: &'a str,
    payload: &'a T,
}

/// Encode an envelope whose payload is a plain string.
pub fn encode(header: &str, payload: &str) -> Result<String> {
    encode_value(header, payload)
}

/// Encode an envelope with a structured payload.
pub fn encode_value<T: Serialize + ?Sized>(header: &str, payload: &T) -> Result<String> {
    serde_json::to_string(&Outbound { header, payload })
        .map_err(|e| RoomlinkError::Internal(format!("envelope encode failed: {e}")))
}

/// Decode wire text into an envelope.
///
/// Fails with `Decode` when the text is not a JSON object or has no string
/// `header` field.
pub fn decode(text: &str) -> Result<Envelope> {
    if !text.trim_start().starts_with('{') {
        return Err(RoomlinkError::Decode("envelope must be a JSON object".into()));
    }
    serde_json::from_str(text)
        .map_err(|e| RoomlinkError::Decode(format!("invalid envelope json: {e}")))
}
