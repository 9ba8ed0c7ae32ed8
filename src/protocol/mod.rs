//! Wire protocol shared with the qdb debug server.
//!
//! Every message in either direction is a JSON text frame carrying a tagged
//! envelope:
//!
//! ```text
//! Client                          Server
//!   |-- {"e": "start", "p": auth} -->|
//!   |-- {"e": "step"} -------------->|
//!   |<-- {"e": "stack", "p": [...]} -|
//!   |<-- {"e": "print", "p": {...}} -|
//!   |-- {"e": "disable", "p": "soft"}|
//! ```
//!
//! Commands are fire-and-forget. Events arrive independently of commands and
//! are never correlated with them.

mod codec;
mod command;
mod event;

pub use codec::*;
pub use command::*;
pub use event::*;
