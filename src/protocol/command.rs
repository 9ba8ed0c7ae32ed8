//! Commands sent from the client to the debug server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A breakpoint location as sent with `set_break` and `clear_break`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointSpec {
    /// Source file.
    pub file: String,
    /// Line number, passed through as typed by the user.
    pub line: String,
    /// Optional enclosing function.
    pub func: Option<String>,
    /// Optional condition expression.
    pub cond: Option<String>,
    /// Temporary breakpoint, removed by the server after the first hit.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub temp: bool,
}

/// A source range requested with `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRange {
    /// Source file.
    pub file: String,
    /// First line, if given.
    pub start: Option<String>,
    /// Last line, if given.
    pub end: Option<String>,
}

/// How the server should detach when the client quits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisableMode {
    /// Stop tracing and let the debuggee continue.
    #[default]
    Soft,
    /// Stop tracing and terminate the debuggee.
    Hard,
}

impl DisableMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for DisableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisableMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" => Ok(Self::Soft),
            "hard" => Ok(Self::Hard),
            other => Err(other.to_string()),
        }
    }
}

/// A client-to-server debugger command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Opens the session; carries the authentication message.
    Start { auth: String },
    Step,
    Return,
    Next,
    Until,
    Continue,
    SetWatch(Vec<String>),
    ClearWatch(Vec<String>),
    SetBreak(BreakpointSpec),
    ClearBreak(BreakpointSpec),
    List(ListRange),
    /// Evaluate a raw expression or statement in the current frame.
    Eval(String),
    Disable(DisableMode),
}

impl Command {
    /// The wire tag for this command.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Step => "step",
            Self::Return => "return",
            Self::Next => "next",
            Self::Until => "until",
            Self::Continue => "continue",
            Self::SetWatch(_) => "set_watch",
            Self::ClearWatch(_) => "clear_watch",
            Self::SetBreak(_) => "set_break",
            Self::ClearBreak(_) => "clear_break",
            Self::List(_) => "list",
            Self::Eval(_) => "eval",
            Self::Disable(_) => "disable",
        }
    }

    /// The payload for this command, if it carries one.
    ///
    /// # Errors
    ///
    /// Returns an error if a structured payload cannot be converted to JSON.
    pub fn payload(&self) -> Result<Option<Value>, serde_json::Error> {
        let payload = match self {
            Self::Step | Self::Return | Self::Next | Self::Until | Self::Continue => None,
            Self::Start { auth } => Some(Value::String(auth.clone())),
            Self::SetWatch(names) | Self::ClearWatch(names) => Some(serde_json::to_value(names)?),
            Self::SetBreak(spec) | Self::ClearBreak(spec) => Some(serde_json::to_value(spec)?),
            Self::List(range) => Some(serde_json::to_value(range)?),
            Self::Eval(line) => Some(Value::String(line.clone())),
            Self::Disable(mode) => Some(Value::String(mode.as_str().to_string())),
        };
        Ok(payload)
    }
}
