//! The foreground command loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::display;
use crate::protocol::{Command, DisableMode};
use crate::session::{ChannelError, CommandSender, FrameSink};

use super::{parse_line, ReplAction, ReplError, UserInputError};

/// Result of handling one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A command was written to the session.
    Sent(Command),
    /// `disable` was sent; the loop should stop.
    Quit(DisableMode),
    /// Invalid input; nothing was sent.
    UserError(UserInputError),
    /// Help was requested; nothing was sent.
    Help(Option<String>),
    /// Blank input with no previous command.
    Ignored,
}

/// Owns the send half of the session and turns input lines into commands.
#[derive(Debug)]
pub struct Repl<S> {
    sender: CommandSender<S>,
    last_line: Option<String>,
}

impl<S: FrameSink> Repl<S> {
    #[must_use]
    pub fn new(sender: CommandSender<S>) -> Self {
        Self {
            sender,
            last_line: None,
        }
    }

    /// Handle one line of input. A blank line repeats the previous one.
    ///
    /// # Errors
    ///
    /// Returns a `ChannelError` if a command cannot be sent. User input
    /// errors are reported through [`LineOutcome::UserError`] instead.
    pub async fn handle_line(&mut self, line: &str) -> Result<LineOutcome, ChannelError> {
        let line = if line.trim().is_empty() {
            match self.last_line.clone() {
                Some(previous) => previous,
                None => return Ok(LineOutcome::Ignored),
            }
        } else {
            let line = line.trim().to_string();
            self.last_line = Some(line.clone());
            line
        };

        let action = match parse_line(&line) {
            Ok(action) => action,
            Err(err) => {
                tracing::debug!(error = %err, "Rejected input");
                return Ok(LineOutcome::UserError(err));
            }
        };

        match action {
            ReplAction::Send(command) => {
                self.sender.send(&command).await?;
                Ok(LineOutcome::Sent(command))
            }
            ReplAction::Quit(mode) => {
                self.sender.send(&Command::Disable(mode)).await?;
                Ok(LineOutcome::Quit(mode))
            }
            ReplAction::Help(topic) => Ok(LineOutcome::Help(topic)),
            ReplAction::Nothing => Ok(LineOutcome::Ignored),
        }
    }

    /// Read lines until `quit` or end of input, which quits softly.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails or a command cannot be sent.
    pub async fn run<R>(&mut self, input: R, prompt: &str) -> Result<DisableMode, ReplError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            display::print_prompt(prompt);
            let Some(line) = lines.next_line().await.map_err(ReplError::Input)? else {
                display::print_newline();
                self.sender
                    .send(&Command::Disable(DisableMode::Soft))
                    .await?;
                return Ok(DisableMode::Soft);
            };

            match self.handle_line(&line).await? {
                LineOutcome::Quit(mode) => return Ok(mode),
                LineOutcome::UserError(err) => display::print_user_error(&err),
                LineOutcome::Help(topic) => display::print_help(topic.as_deref()),
                LineOutcome::Sent(_) | LineOutcome::Ignored => {}
            }
        }
    }

    /// Number of commands sent, including `start`.
    #[must_use]
    pub fn commands_sent(&self) -> usize {
        self.sender.sent()
    }

    /// Give back the send half, e.g. to close it.
    pub fn into_sender(self) -> CommandSender<S> {
        self.sender
    }
}
