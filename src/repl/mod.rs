//! Interactive command side of the client.
//!
//! Input lines are parsed into [`ReplAction`]s by [`parse_line`] and the
//! resulting commands are written through the session's send half by
//! [`Repl`]. Nothing here waits for server events.

mod error;
mod parser;
mod runner;

pub use error::*;
pub use parser::*;
pub use runner::*;
