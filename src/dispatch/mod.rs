//! Event dispatcher: decodes inbound frames and renders them to the trace.
//!
//! The dispatcher runs on its own task from the moment the session is
//! established and owns only the receive half of the connection:
//!
//! ```text
//! InboundFrames --> decode_event --> render --> OutputSink
//!      |                 |
//!      | end/error       | malformed
//!      v                 v
//!  Terminated <-- MalformedFramePolicy
//! ```

mod dispatcher;
mod error;
mod render;
mod sink;
mod state;

pub use dispatcher::*;
pub use error::*;
pub use render::*;
pub use sink::*;
pub use state::*;
