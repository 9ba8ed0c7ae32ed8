//! REPL error types.

use crate::session::ChannelError;

/// Malformed or incomplete REPL input. Reported locally, never sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserInputError {
    /// A command that needs arguments got none.
    #[error("{command}: missing argument(s)")]
    MissingArgument { command: &'static str },

    /// A breakpoint command got a file but no line.
    #[error("{command}: missing line number")]
    MissingLineNumber { command: &'static str },

    #[error("{command}: too many arguments")]
    TooManyArguments { command: &'static str },

    #[error("disable: argument must be 'soft' or 'hard', got '{0}'")]
    InvalidQuitMode(String),
}

/// Errors that end the REPL loop.
#[derive(thiserror::Error, Debug)]
pub enum ReplError {
    /// Reading the next input line failed.
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
