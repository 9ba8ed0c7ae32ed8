//! Dispatcher behavior over in-memory frame streams.

use std::time::Duration;

use futures_util::stream;
use qdb::dispatch::{
    DispatchSummary, Dispatcher, DispatcherState, MalformedFramePolicy, OutputSink, SinkError,
    Termination,
};
use qdb::session::{ChannelError, InboundFrames};

fn frames(items: &[&str]) -> InboundFrames {
    let items: Vec<Result<String, ChannelError>> =
        items.iter().map(|item| Ok(item.to_string())).collect();
    Box::pin(stream::iter(items))
}

async fn dispatch(
    inbound: InboundFrames,
    policy: MalformedFramePolicy,
) -> (DispatchSummary, String) {
    let (summary, sink) = Dispatcher::new(inbound, OutputSink::new(Vec::new()))
        .with_policy(policy)
        .run()
        .await;
    assert!(sink.is_closed());
    let text = String::from_utf8(sink.into_inner()).unwrap();
    (summary, text)
}

#[tokio::test]
async fn test_renders_events_in_order() {
    let inbound = frames(&[
        r#"{"e":"stack","p":[{"file":"a.py","line":3,"code":"foo()"}]}"#,
        r#"{"e":"print","p":{"input":"x","output":"1"}}"#,
        r#"{"e":"watchlist","p":[{"name":"x","value":"1"}]}"#,
        r#"{"e":"breakpoints","p":[{"file":"a.py","line":3}]}"#,
        r#"{"e":"return","p":"2"}"#,
    ]);

    let (summary, text) = dispatch(inbound, MalformedFramePolicy::Terminate).await;

    assert_eq!(
        text,
        "Tracing...\n\
         > a.py:3\n\
         -> foo()\n\
         x: 1\n\
         watchlist: [\n  > x: 1\n]\n\
         --> returning with 2\n"
    );
    assert_eq!(summary.frames, 5);
    assert_eq!(summary.events, 5);
    assert_eq!(summary.termination, Termination::EndOfStream);
}

#[tokio::test]
async fn test_empty_stream_writes_only_header() {
    let (summary, text) = dispatch(frames(&[]), MalformedFramePolicy::Terminate).await;

    assert_eq!(text, "Tracing...\n");
    assert_eq!(summary.frames, 0);
    assert!(summary.termination.is_clean());
}

#[tokio::test]
async fn test_terminate_policy_stops_at_malformed_frame() {
    let inbound = frames(&[
        r#"{"e":"return","p":"1"}"#,
        "not json",
        r#"{"e":"return","p":"2"}"#,
    ]);

    let (summary, text) = dispatch(inbound, MalformedFramePolicy::Terminate).await;

    assert!(text.contains("--> returning with 1\n"));
    assert!(text.contains("*** error: malformed frame:"));
    assert!(!text.contains("--> returning with 2"));
    assert!(matches!(
        summary.termination,
        Termination::ProtocolViolation(_)
    ));
    assert!(!summary.termination.is_clean());
    assert_eq!(summary.frames, 2);
}

#[tokio::test]
async fn test_skip_policy_continues_past_malformed_frame() {
    let inbound = frames(&[
        "not json",
        r#"{"e":"stack","p":"not a list"}"#,
        r#"{"e":"return","p":"2"}"#,
    ]);

    let (summary, text) = dispatch(inbound, MalformedFramePolicy::Skip).await;

    assert_eq!(text.matches("*** error: malformed frame:").count(), 2);
    assert!(text.ends_with("--> returning with 2\n"));
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.events, 1);
    assert_eq!(summary.termination, Termination::EndOfStream);
}

#[tokio::test]
async fn test_unknown_tag_is_not_fatal() {
    let inbound = frames(&[r#"{"e":"bogus"}"#, r#"{"e":"return"}"#]);

    let (summary, text) = dispatch(inbound, MalformedFramePolicy::Terminate).await;

    assert_eq!(
        text,
        "Tracing...\n*** error: bogus: unknown event type\n--> returning with None\n"
    );
    assert_eq!(summary.termination, Termination::EndOfStream);
}

#[tokio::test]
async fn test_transport_error_terminates() {
    let items: Vec<Result<String, ChannelError>> = vec![
        Ok(r#"{"e":"return","p":"1"}"#.to_string()),
        Err(ChannelError::Closed),
        Ok(r#"{"e":"return","p":"2"}"#.to_string()),
    ];

    let (summary, text) = dispatch(Box::pin(stream::iter(items)), MalformedFramePolicy::Skip).await;

    assert_eq!(text, "Tracing...\n--> returning with 1\n");
    assert!(matches!(summary.termination, Termination::TransportError(_)));
}

#[tokio::test]
async fn test_shutdown_cancels_idle_dispatcher() {
    let inbound: InboundFrames = Box::pin(stream::pending::<Result<String, ChannelError>>());
    let handle = Dispatcher::new(inbound, OutputSink::new(Vec::new())).spawn();

    assert!(!handle.is_finished());
    assert_eq!(handle.state(), DispatcherState::Reading);
    let summary = handle.shutdown(Duration::from_millis(10)).await.unwrap();

    assert_eq!(summary.termination, Termination::Cancelled);
    assert_eq!(summary.frames, 0);
}

#[tokio::test]
async fn test_join_returns_summary() {
    let handle = Dispatcher::new(
        frames(&[r#"{"e":"list","p":"1  x = 1"}"#]),
        OutputSink::new(Vec::new()),
    )
    .spawn();

    let summary = handle.join().await.unwrap();

    assert_eq!(summary.events, 1);
    assert_eq!(summary.termination, Termination::EndOfStream);
}

#[tokio::test]
async fn test_sink_rejects_writes_after_termination() {
    let (_, mut sink) = Dispatcher::new(frames(&[]), OutputSink::new(Vec::new()))
        .run()
        .await;

    assert_eq!(sink.lines(), 1);
    let err = tokio_test::assert_err!(sink.write_line("late").await);
    assert!(matches!(err, SinkError::Closed));
}

#[tokio::test]
async fn test_handle_reports_terminated_after_stream_ends() {
    let handle = Dispatcher::new(frames(&[]), OutputSink::new(Vec::new())).spawn();

    tokio::time::timeout(Duration::from_secs(5), async {
        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    assert_eq!(handle.state(), DispatcherState::Terminated);
    assert!(handle.join().await.unwrap().termination.is_clean());
}

#[tokio::test]
async fn test_write_failure_still_terminates_with_summary() {
    let writer = tokio_test::io::Builder::new()
        .write(b"Tracing...\n")
        .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "disk gone"))
        .build();

    let (summary, sink) = Dispatcher::new(
        frames(&[r#"{"e":"return","p":"1"}"#, r#"{"e":"return","p":"2"}"#]),
        OutputSink::new(writer),
    )
    .run()
    .await;

    assert!(sink.is_closed());
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.events, 1);
    assert!(matches!(
        &summary.termination,
        Termination::OutputError(reason) if reason.contains("disk gone")
    ));
    assert!(!summary.termination.is_clean());
}
