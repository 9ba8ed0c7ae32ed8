//! Rendering of events into trace lines.

use crate::protocol::{value_text, Event, Frame, PrintOutput, ServerError, WatchEntry};

/// Render an event into the lines it contributes to the trace.
///
/// Returns an empty vector for events that produce no output.
#[must_use]
pub fn render(event: &Event) -> Vec<String> {
    match event {
        Event::Print(output) => render_print(output),
        Event::List(listing) => vec![value_text(listing)],
        Event::Stack(frames) => render_stack(frames),
        Event::Watchlist(entries) => render_watchlist(entries),
        Event::Breakpoints(_) => Vec::new(),
        Event::Error(error) => vec![render_error(error)],
        Event::Return(value) => vec![format!(
            "--> returning with {}",
            value.as_ref().map_or_else(|| "None".to_string(), value_text)
        )],
        Event::Unknown { tag, .. } => vec![format!("*** error: {tag}: unknown event type")],
    }
}

fn render_print(output: &PrintOutput) -> Vec<String> {
    if output.output.is_empty() {
        Vec::new()
    } else {
        vec![format!("{}: {}", output.input, output.output)]
    }
}

fn render_stack(frames: &[Frame]) -> Vec<String> {
    let Some(top) = frames.last() else {
        tracing::warn!("Received empty stack");
        return Vec::new();
    };
    vec![
        format!("> {}:{}", top.file, top.line),
        format!("-> {}", top.code),
    ]
}

fn render_watchlist(entries: &[WatchEntry]) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len() + 2);
    lines.push("watchlist: [".to_string());
    lines.extend(
        entries
            .iter()
            .map(|entry| format!("  > {}: {}", entry.name, entry.value)),
    );
    lines.push("]".to_string());
    lines
}

fn render_error(error: &ServerError) -> String {
    format!("*** error: {}: {}", error.kind, value_text(&error.data))
}
