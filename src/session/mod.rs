//! Session channel to the debug server.
//!
//! One WebSocket connection is split into two halves:
//!
//! ```text
//!              +-- CommandSender (REPL task, exclusive) --> server
//! connection --+
//!              +-- InboundFrames (dispatcher task) <------- server
//! ```
//!
//! The halves never wait on each other. Closing the send half starts the
//! WebSocket close handshake, which in turn ends the inbound stream.

mod channel;
mod config;
mod error;

pub use channel::*;
pub use config::*;
pub use error::ChannelError;
