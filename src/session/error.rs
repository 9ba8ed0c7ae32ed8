//! Session channel error types.

use tokio_tungstenite::tungstenite::Error as WsError;

use crate::protocol::CodecError;

/// Errors that can occur on the session channel.
#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    /// The address template did not produce a usable WebSocket URL.
    #[error("Invalid session address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The WebSocket handshake failed.
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: Box<WsError>,
    },

    /// The send half has been closed.
    #[error("Session channel closed")]
    Closed,

    /// The connection failed after it was established.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<WsError>),

    /// An outbound command could not be encoded.
    #[error("Failed to encode command: {0}")]
    Codec(#[from] CodecError),
}

impl From<WsError> for ChannelError {
    fn from(err: WsError) -> Self {
        match err {
            WsError::ConnectionClosed | WsError::AlreadyClosed => Self::Closed,
            other => Self::Transport(Box::new(other)),
        }
    }
}
