//! Event dispatcher tests.

mod dispatcher_test;

/// Verify the dispatcher types are exported from the library.
#[test]
fn test_all_dispatch_types_exported() {
    use qdb::dispatch::{
        render, DispatchError, DispatchSummary, Dispatcher, DispatcherHandle, DispatcherState,
        MalformedFramePolicy, OutputSink, SinkError, Termination, TRACE_HEADER,
    };

    let _ = std::mem::size_of::<Dispatcher<Vec<u8>>>();
    let _ = std::mem::size_of::<DispatcherHandle<Vec<u8>>>();
    let _ = std::mem::size_of::<DispatchError>();
    let _ = std::mem::size_of::<SinkError>();
    let _: fn(&qdb::protocol::Event) -> Vec<String> = render;
    let _ = OutputSink::new(Vec::<u8>::new());
    let _ = DispatchSummary {
        frames: 0,
        events: 0,
        skipped: 0,
        termination: Termination::EndOfStream,
    };
    assert_eq!(DispatcherState::default(), DispatcherState::Reading);
    assert_eq!(MalformedFramePolicy::default(), MalformedFramePolicy::Terminate);
    assert_eq!(TRACE_HEADER, "Tracing...");
}
