//! Translation of REPL input lines into commands.

use crate::protocol::{BreakpointSpec, Command, DisableMode, ListRange};

use super::UserInputError;

/// What the REPL should do with one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplAction {
    /// Send a command to the server.
    Send(Command),
    /// Send `disable` with this mode, then stop reading input.
    Quit(DisableMode),
    /// Show local help, optionally for one command.
    Help(Option<String>),
    /// Blank input.
    Nothing,
}

/// Usage information for one REPL command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHelp {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
}

/// Every command the REPL understands. Any other input is evaluated.
pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "step",
        aliases: &["s"],
        usage: "s(tep)",
        summary: "Execute the current line, stopping at the first possible occasion.",
    },
    CommandHelp {
        name: "next",
        aliases: &["n"],
        usage: "n(ext)",
        summary: "Continue until the next line in the current function.",
    },
    CommandHelp {
        name: "return",
        aliases: &["r"],
        usage: "r(eturn)",
        summary: "Continue until the current function returns.",
    },
    CommandHelp {
        name: "until",
        aliases: &["unt"],
        usage: "unt(il)",
        summary: "Continue until a line greater than the current one is reached.",
    },
    CommandHelp {
        name: "continue",
        aliases: &["c", "cont"],
        usage: "c(ontinue)",
        summary: "Continue until a breakpoint is hit.",
    },
    CommandHelp {
        name: "watch",
        aliases: &["w"],
        usage: "w(atch) <expr> [expr ...]",
        summary: "Add expressions to the watchlist.",
    },
    CommandHelp {
        name: "unwatch",
        aliases: &["unw"],
        usage: "unw(atch) <expr> [expr ...]",
        summary: "Remove expressions from the watchlist.",
    },
    CommandHelp {
        name: "break",
        aliases: &["b"],
        usage: "b(reak) <file> <line> [func] [cond]",
        summary: "Set a breakpoint.",
    },
    CommandHelp {
        name: "tbreak",
        aliases: &["tb"],
        usage: "tb(reak) <file> <line> [func] [cond]",
        summary: "Set a temporary breakpoint, removed after the first hit.",
    },
    CommandHelp {
        name: "clear",
        aliases: &["cl"],
        usage: "cl(ear) <file> <line> [func] [cond]",
        summary: "Clear a breakpoint.",
    },
    CommandHelp {
        name: "list",
        aliases: &["l"],
        usage: "l(ist) <file> [start] [end]",
        summary: "List source lines.",
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        usage: "q(uit) [soft|hard]",
        summary: "Detach from the session; 'hard' also stops the debuggee.",
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        usage: "h(elp) [command]",
        summary: "Show help.",
    },
];

/// Look up a command by name or alias.
#[must_use]
pub fn find_command(name: &str) -> Option<&'static CommandHelp> {
    COMMANDS
        .iter()
        .find(|c| c.name == name || c.aliases.contains(&name))
}

/// Parse one input line.
///
/// The first whitespace-delimited word selects the command. Input whose
/// first word is not a known command is sent verbatim as `eval`.
///
/// # Errors
///
/// Returns a `UserInputError` for missing or malformed arguments.
pub fn parse_line(line: &str) -> Result<ReplAction, UserInputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplAction::Nothing);
    }
    if let Some(topic) = line.strip_prefix('?') {
        return Ok(ReplAction::Help(help_topic(topic)));
    }

    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(keyword, rest)| (keyword, rest.trim()));

    let Some(command) = find_command(keyword) else {
        return Ok(ReplAction::Send(Command::Eval(line.to_string())));
    };

    let action = match command.name {
        "step" => ReplAction::Send(Command::Step),
        "next" => ReplAction::Send(Command::Next),
        "return" => ReplAction::Send(Command::Return),
        "until" => ReplAction::Send(Command::Until),
        "continue" => ReplAction::Send(Command::Continue),
        "watch" => ReplAction::Send(Command::SetWatch(expressions(rest, "w(atch)")?)),
        "unwatch" => ReplAction::Send(Command::ClearWatch(expressions(rest, "unw(atch)")?)),
        "break" => ReplAction::Send(Command::SetBreak(parse_breakpoint(
            "b(reak)",
            &tokenize(rest),
            false,
        )?)),
        "tbreak" => ReplAction::Send(Command::SetBreak(parse_breakpoint(
            "tb(reak)",
            &tokenize(rest),
            true,
        )?)),
        "clear" => ReplAction::Send(Command::ClearBreak(parse_breakpoint(
            "cl(ear)",
            &tokenize(rest),
            false,
        )?)),
        "list" => ReplAction::Send(Command::List(parse_list(&tokenize(rest))?)),
        "quit" => ReplAction::Quit(parse_quit(rest)?),
        "help" => ReplAction::Help(help_topic(rest)),
        other => {
            tracing::warn!(command = other, "Command has no handler, evaluating");
            ReplAction::Send(Command::Eval(line.to_string()))
        }
    };
    Ok(action)
}

fn help_topic(rest: &str) -> Option<String> {
    let topic = rest.trim();
    (!topic.is_empty()).then(|| topic.to_string())
}

/// Watch expressions are the whitespace-separated words, sent as typed.
fn expressions(rest: &str, command: &'static str) -> Result<Vec<String>, UserInputError> {
    let names: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    if names.is_empty() {
        return Err(UserInputError::MissingArgument { command });
    }
    Ok(names)
}

/// Build a breakpoint from `<file> <line> [func] [cond...]`.
///
/// Tokens after the fourth are joined into the condition, so
/// `break a.py 3 f x > 1` sets `cond` to `x > 1`. A condition given as one
/// fully quoted token has its quotes removed; otherwise it is kept as typed.
///
/// # Errors
///
/// Returns `MissingArgument` without a file and `MissingLineNumber` without a
/// line.
pub fn parse_breakpoint(
    command: &'static str,
    tokens: &[String],
    temp: bool,
) -> Result<BreakpointSpec, UserInputError> {
    let file = tokens
        .first()
        .ok_or(UserInputError::MissingArgument { command })?;
    let line = tokens
        .get(1)
        .ok_or(UserInputError::MissingLineNumber { command })?;
    let cond = match tokens.get(3..) {
        Some([single]) => Some(unquote(single).to_string()),
        Some(rest) if !rest.is_empty() => Some(rest.join(" ")),
        _ => None,
    };

    Ok(BreakpointSpec {
        file: unquote(file).to_string(),
        line: unquote(line).to_string(),
        func: tokens.get(2).map(|func| unquote(func).to_string()),
        cond,
        temp,
    })
}

/// Build a list range from `<file> [start] [end]`.
///
/// # Errors
///
/// Returns `MissingArgument` without a file and `TooManyArguments` with more
/// than three tokens.
pub fn parse_list(tokens: &[String]) -> Result<ListRange, UserInputError> {
    const COMMAND: &str = "l(ist)";

    let file = tokens
        .first()
        .ok_or(UserInputError::MissingArgument { command: COMMAND })?;
    if tokens.len() > 3 {
        return Err(UserInputError::TooManyArguments { command: COMMAND });
    }

    Ok(ListRange {
        file: unquote(file).to_string(),
        start: tokens.get(1).map(|start| unquote(start).to_string()),
        end: tokens.get(2).map(|end| unquote(end).to_string()),
    })
}

fn parse_quit(rest: &str) -> Result<DisableMode, UserInputError> {
    if rest.is_empty() {
        return Ok(DisableMode::Soft);
    }
    rest.parse().map_err(UserInputError::InvalidQuitMode)
}

/// Split arguments on whitespace. Whitespace inside a single- or
/// double-quoted span does not split, and the quotes stay in the token. An
/// unclosed quote runs to the end of the input.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                }
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Strip one pair of matching quotes wrapping the whole token.
fn unquote(token: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = token.strip_prefix(q).and_then(|t| t.strip_suffix(q)) {
            if !inner.contains(q) {
                return inner;
            }
        }
    }
    token
}
