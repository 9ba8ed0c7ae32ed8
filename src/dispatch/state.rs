//! Dispatcher state and termination reasons.

use serde::{Deserialize, Serialize};

/// Lifecycle of the event dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatcherState {
    #[default]
    Reading,
    Terminated,
}

/// Why the dispatcher stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The server closed the session.
    EndOfStream,
    /// A frame could not be decoded and the policy is `terminate`.
    ProtocolViolation(String),
    /// The connection failed while reading.
    TransportError(String),
    /// Stopped by the cancellation token.
    Cancelled,
    /// The trace could not be written.
    OutputError(String),
}

impl Termination {
    /// Whether this is an orderly shutdown rather than a failure.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::EndOfStream | Self::Cancelled)
    }
}

/// What to do with a frame that is not a well-formed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedFramePolicy {
    /// Report it and stop the dispatcher.
    #[default]
    Terminate,
    /// Report it and keep reading.
    Skip,
}

/// Counters reported when the dispatcher stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Raw frames received.
    pub frames: usize,
    /// Frames decoded into events.
    pub events: usize,
    /// Malformed frames skipped under the `skip` policy.
    pub skipped: usize,
    pub termination: Termination,
}
