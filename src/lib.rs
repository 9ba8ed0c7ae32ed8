//! qdb - remote debugger REPL client.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod protocol;
pub mod repl;
pub mod session;
