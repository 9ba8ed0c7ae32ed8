//! Events sent from the debug server to the client.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CodecError, Envelope};

/// Output of an evaluated input line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintOutput {
    /// The line that was evaluated.
    pub input: String,
    /// Whatever it printed or returned; empty when there is nothing to show.
    #[serde(default)]
    pub output: String,
}

/// One frame of a stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub file: String,
    pub line: u64,
    pub code: String,
}

/// A watched expression and its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub name: String,
    pub value: String,
}

/// An error reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerError {
    /// Error class name, e.g. `NameError`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Error detail.
    #[serde(default)]
    pub data: Value,
}

/// A server-to-client event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Print(PrintOutput),
    /// Source listing text.
    List(Value),
    /// Current stack, outermost first.
    Stack(Vec<Frame>),
    Watchlist(Vec<WatchEntry>),
    /// Breakpoint acknowledgment; carries the server's breakpoint table.
    Breakpoints(Option<Value>),
    Error(ServerError),
    /// The current frame is returning with this value.
    Return(Option<Value>),
    /// Any tag outside the known vocabulary.
    Unknown {
        tag: String,
        payload: Option<Value>,
    },
}

impl Event {
    /// Convert a decoded envelope into a typed event.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Payload` if a known tag carries a payload of the
    /// wrong shape.
    pub fn from_envelope(envelope: Envelope) -> Result<Self, CodecError> {
        let Envelope { tag, payload } = envelope;
        let event = match tag.as_str() {
            "print" => Self::Print(typed_payload(&tag, payload)?),
            "list" => Self::List(payload.unwrap_or(Value::Null)),
            "stack" => Self::Stack(typed_payload(&tag, payload)?),
            "watchlist" => Self::Watchlist(typed_payload(&tag, payload)?),
            "breakpoints" => Self::Breakpoints(payload),
            "error" => Self::Error(typed_payload(&tag, payload)?),
            "return" => Self::Return(payload),
            _ => Self::Unknown { tag, payload },
        };
        Ok(event)
    }

    /// The wire tag this event arrived with.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Print(_) => "print",
            Self::List(_) => "list",
            Self::Stack(_) => "stack",
            Self::Watchlist(_) => "watchlist",
            Self::Breakpoints(_) => "breakpoints",
            Self::Error(_) => "error",
            Self::Return(_) => "return",
            Self::Unknown { tag, .. } => tag.as_str(),
        }
    }
}

fn typed_payload<T: DeserializeOwned>(tag: &str, payload: Option<Value>) -> Result<T, CodecError> {
    serde_json::from_value(payload.unwrap_or(Value::Null)).map_err(|source| CodecError::Payload {
        tag: tag.to_string(),
        source,
    })
}

/// Render a payload value as plain text: strings without quotes, everything
/// else as compact JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
