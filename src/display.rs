//! Colored terminal output for the REPL.
//!
//! Everything the user sees on the terminal goes through here. Rendered
//! server events never do; they go to the trace file.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use owo_colors::OwoColorize;

use crate::dispatch::{DispatchSummary, Termination};
use crate::repl::{find_command, UserInputError, COMMANDS};

/// Print the input prompt without a trailing newline.
pub fn print_prompt(prompt: &str) {
    print!("{prompt}");
    let _ = io::stdout().flush();
}

/// Terminate the prompt line, e.g. after end of input.
pub fn print_newline() {
    println!();
}

/// Print the banner shown once the session is up.
pub fn print_connected(address: &str, trace_path: &Path) {
    println!(
        "{} {} {}",
        "qdb connected:".green().bold(),
        trace_path.display(),
        format!("({address})").dimmed()
    );
    let _ = io::stdout().flush();
}

/// Print a rejected input line.
pub fn print_user_error(err: &UserInputError) {
    println!("{}", format!("*** error: {err}").red());
    let _ = io::stdout().flush();
}

/// Print a fatal error.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "*** fatal:".red().bold(), message);
}

/// Print help for one command, or the command list.
pub fn print_help(topic: Option<&str>) {
    print!("{}", format_help(topic));
    let _ = io::stdout().flush();
}

/// Print how the session ended.
pub fn print_session_end(summary: &DispatchSummary) {
    let line = format_session_end(summary);
    if summary.termination.is_clean() {
        println!("{}", line.dimmed());
    } else {
        println!("{}", line.yellow());
    }
    let _ = io::stdout().flush();
}

/// Help text for one command, or the full command list.
#[must_use]
pub fn format_help(topic: Option<&str>) -> String {
    let mut out = String::new();
    match topic {
        Some(name) => match find_command(name) {
            Some(help) => {
                let _ = writeln!(out, "{}", help.usage);
                let _ = writeln!(out, "    {}", help.summary);
            }
            None => {
                let _ = writeln!(out, "*** No help on {name}");
            }
        },
        None => {
            let _ = writeln!(out, "Commands:");
            for help in COMMANDS {
                let _ = writeln!(out, "  {:<38} {}", help.usage, help.summary);
            }
            let _ = writeln!(out, "Any other input is evaluated in the current frame.");
        }
    }
    out
}

/// One-line description of a finished dispatcher.
#[must_use]
pub fn format_session_end(summary: &DispatchSummary) -> String {
    let reason = match &summary.termination {
        Termination::EndOfStream => "server closed the session".to_string(),
        Termination::Cancelled => "detached".to_string(),
        Termination::ProtocolViolation(reason) => format!("protocol violation: {reason}"),
        Termination::TransportError(reason) => format!("connection lost: {reason}"),
        Termination::OutputError(reason) => format!("trace write failed: {reason}"),
    };
    format!(
        "qdb disconnected: {reason} ({} events)",
        summary.events
    )
}
