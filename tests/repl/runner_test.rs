//! Tests for the REPL loop over a loopback channel.

use qdb::protocol::DisableMode;
use qdb::repl::{LineOutcome, Repl, UserInputError};
use qdb::session::CommandSender;
use tokio::sync::mpsc;

fn loopback() -> (
    Repl<mpsc::UnboundedSender<String>>,
    mpsc::UnboundedReceiver<String>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Repl::new(CommandSender::new(tx)), rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

#[tokio::test]
async fn watch_without_arguments_writes_no_frame() {
    let (mut repl, mut rx) = loopback();

    let outcome = repl.handle_line("watch").await.unwrap();

    assert!(matches!(
        outcome,
        LineOutcome::UserError(UserInputError::MissingArgument { .. })
    ));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn quit_variants_send_disable() {
    for (line, payload) in [("quit", "soft"), ("quit soft", "soft"), ("quit hard", "hard")] {
        let (mut repl, mut rx) = loopback();

        let outcome = repl.handle_line(line).await.unwrap();

        assert!(matches!(outcome, LineOutcome::Quit(_)));
        assert_eq!(
            drain(&mut rx),
            vec![format!(r#"{{"e":"disable","p":"{payload}"}}"#)]
        );
    }
}

#[tokio::test]
async fn quit_bogus_sends_nothing_and_continues() {
    let (mut repl, mut rx) = loopback();

    let outcome = repl.handle_line("quit bogus").await.unwrap();
    assert_eq!(
        outcome,
        LineOutcome::UserError(UserInputError::InvalidQuitMode("bogus".to_string()))
    );
    assert!(drain(&mut rx).is_empty());

    // The loop is still usable.
    repl.handle_line("next").await.unwrap();
    assert_eq!(drain(&mut rx), vec![r#"{"e":"next"}"#.to_string()]);
}

#[tokio::test]
async fn session_script_produces_expected_frames() {
    let (mut repl, mut rx) = loopback();
    let script = b"break a.py 10\nwatch x y\n\nlist a.py 1 20\nx + 1\nhelp\nquit hard\n";

    let mode = repl.run(&script[..], "").await.unwrap();

    assert_eq!(mode, DisableMode::Hard);
    assert_eq!(
        drain(&mut rx),
        vec![
            r#"{"e":"set_break","p":{"file":"a.py","line":"10","func":null,"cond":null}}"#,
            r#"{"e":"set_watch","p":["x","y"]}"#,
            r#"{"e":"set_watch","p":["x","y"]}"#,
            r#"{"e":"list","p":{"file":"a.py","start":"1","end":"20"}}"#,
            r#"{"e":"eval","p":"x + 1"}"#,
            r#"{"e":"disable","p":"hard"}"#,
        ]
    );
}

#[tokio::test]
async fn closed_channel_is_reported() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let mut repl = Repl::new(CommandSender::new(tx));

    assert!(repl.handle_line("step").await.is_err());
}
