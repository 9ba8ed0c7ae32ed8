//! Envelope encoding and decoding.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Command, Event};

/// The `{"e": tag, "p"?: payload}` structure shared by commands and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message tag.
    #[serde(rename = "e")]
    pub tag: String,
    /// Optional payload. Never serialized as `null`.
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Envelope {
    /// Build an envelope, dropping empty payloads.
    #[must_use]
    pub fn new(tag: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            tag: tag.into(),
            payload: payload.filter(|p| !is_empty_payload(p)),
        }
    }
}

/// Errors produced while encoding or decoding frames.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// The frame is not a JSON object with a string `e` field.
    #[error("invalid envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The tag is known but its payload has the wrong shape.
    #[error("invalid payload for '{tag}': {source}")]
    Payload {
        tag: String,
        #[source]
        source: serde_json::Error,
    },

    /// A payload could not be serialized.
    #[error("failed to serialize message: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Whether a payload counts as absent on the wire.
///
/// `null`, the empty string, the empty array and the empty object are all
/// sent as a bare `{"e": tag}`.
#[must_use]
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Encode a tag and optional payload into a JSON text frame.
///
/// # Errors
///
/// Returns `CodecError::Serialize` if the envelope cannot be serialized.
pub fn encode(tag: &str, payload: Option<&Value>) -> Result<String, CodecError> {
    let envelope = Envelope::new(tag, payload.cloned());
    serde_json::to_string(&envelope).map_err(CodecError::Serialize)
}

/// Encode a typed command into a JSON text frame.
///
/// # Errors
///
/// Returns `CodecError::Serialize` if the payload cannot be serialized.
pub fn encode_command(command: &Command) -> Result<String, CodecError> {
    let payload = command.payload().map_err(CodecError::Serialize)?;
    encode(command.tag(), payload.as_ref())
}

/// Decode a JSON text frame into its envelope.
///
/// # Errors
///
/// Returns `CodecError::Envelope` if the frame is not a tagged JSON object.
pub fn decode(frame: &str) -> Result<Envelope, CodecError> {
    let value: Value = serde_json::from_str(frame).map_err(CodecError::Envelope)?;
    if !value.is_object() {
        return Err(CodecError::Envelope(serde_json::Error::custom(
            "frame is not a JSON object",
        )));
    }
    serde_json::from_value(value).map_err(CodecError::Envelope)
}

/// Decode a JSON text frame into a typed event.
///
/// # Errors
///
/// Returns `CodecError::Envelope` for malformed frames and
/// `CodecError::Payload` when a known tag carries a payload of the wrong shape.
pub fn decode_event(frame: &str) -> Result<Event, CodecError> {
    Event::from_envelope(decode(frame)?)
}
