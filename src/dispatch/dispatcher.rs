//! The event dispatcher loop.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncWrite;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{
    render, DispatchError, DispatchSummary, DispatcherState, MalformedFramePolicy, OutputSink,
    SinkError, Termination,
};
use crate::protocol::{decode_event, Event};
use crate::session::InboundFrames;

/// First line written to every trace.
pub const TRACE_HEADER: &str = "Tracing...";

/// Drains inbound frames and renders them into an output sink.
///
/// Runs until the stream ends, a transport error occurs, a malformed frame
/// arrives under [`MalformedFramePolicy::Terminate`], a trace write fails, or
/// the cancellation token fires. The sink is closed on the way out.
pub struct Dispatcher<W> {
    frames: InboundFrames,
    sink: OutputSink<W>,
    policy: MalformedFramePolicy,
    cancel: CancellationToken,
    frames_seen: usize,
    events: usize,
    skipped: usize,
}

impl<W: AsyncWrite + Unpin + Send + 'static> Dispatcher<W> {
    #[must_use]
    pub fn new(frames: InboundFrames, sink: OutputSink<W>) -> Self {
        Self {
            frames,
            sink,
            policy: MalformedFramePolicy::default(),
            cancel: CancellationToken::new(),
            frames_seen: 0,
            events: 0,
            skipped: 0,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MalformedFramePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run on a background task.
    #[must_use]
    pub fn spawn(self) -> DispatcherHandle<W> {
        let cancel = self.cancel.clone();
        let task = tokio::spawn(self.run());
        DispatcherHandle { task, cancel }
    }

    /// Run to completion, returning the summary and the closed sink.
    ///
    /// A failed trace write ends the run with [`Termination::OutputError`].
    pub async fn run(mut self) -> (DispatchSummary, OutputSink<W>) {
        let termination = match self.read_frames().await {
            Ok(termination) => termination,
            Err(e) => {
                tracing::error!(error = %e, "Failed to write trace");
                Termination::OutputError(e.to_string())
            }
        };
        self.terminate(termination).await
    }

    async fn read_frames(&mut self) -> Result<Termination, SinkError> {
        self.sink.write_line(TRACE_HEADER).await?;

        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Ok(Termination::Cancelled),
                next = self.frames.next() => next,
            };

            match next {
                None => return Ok(Termination::EndOfStream),
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Session transport failed");
                    return Ok(Termination::TransportError(e.to_string()));
                }
                Some(Ok(frame)) => {
                    self.frames_seen += 1;
                    if let Some(termination) = self.handle_frame(&frame).await? {
                        return Ok(termination);
                    }
                }
            }
        }
    }

    async fn handle_frame(&mut self, frame: &str) -> Result<Option<Termination>, SinkError> {
        match decode_event(frame) {
            Ok(event) => {
                self.events += 1;
                tracing::trace!(tag = event.tag(), "Rendering event");
                if let Event::Unknown { tag, .. } = &event {
                    tracing::warn!(tag = %tag, "Unknown event type");
                }
                for line in render(&event) {
                    self.sink.write_line(&line).await?;
                }
                Ok(None)
            }
            Err(err) => {
                self.sink
                    .write_line(&format!("*** error: malformed frame: {err}"))
                    .await?;
                match self.policy {
                    MalformedFramePolicy::Terminate => {
                        tracing::error!(error = %err, frame = %frame, "Malformed frame, stopping dispatcher");
                        Ok(Some(Termination::ProtocolViolation(err.to_string())))
                    }
                    MalformedFramePolicy::Skip => {
                        tracing::warn!(error = %err, frame = %frame, "Skipping malformed frame");
                        self.skipped += 1;
                        Ok(None)
                    }
                }
            }
        }
    }

    async fn terminate(mut self, mut termination: Termination) -> (DispatchSummary, OutputSink<W>) {
        tracing::debug!(
            from = ?DispatcherState::Reading,
            to = ?DispatcherState::Terminated,
            reason = ?termination,
            "State transition"
        );
        if let Err(e) = self.sink.close().await {
            tracing::warn!(error = %e, "Failed to close trace");
            if termination.is_clean() {
                termination = Termination::OutputError(e.to_string());
            }
        }

        let summary = DispatchSummary {
            frames: self.frames_seen,
            events: self.events,
            skipped: self.skipped,
            termination,
        };
        tracing::info!(
            frames = summary.frames,
            events = summary.events,
            termination = ?summary.termination,
            "Dispatcher stopped"
        );
        (summary, self.sink)
    }
}

/// Handle to a dispatcher running on a background task.
#[derive(Debug)]
pub struct DispatcherHandle<W> {
    task: JoinHandle<(DispatchSummary, OutputSink<W>)>,
    cancel: CancellationToken,
}

impl<W> DispatcherHandle<W> {
    /// Ask the dispatcher to stop at its next await point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    #[must_use]
    pub fn state(&self) -> DispatcherState {
        if self.task.is_finished() {
            DispatcherState::Terminated
        } else {
            DispatcherState::Reading
        }
    }

    /// Wait for the dispatcher to stop on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the task panicked or was aborted.
    pub async fn join(self) -> Result<DispatchSummary, DispatchError> {
        let (summary, _sink) = self.task.await?;
        Ok(summary)
    }

    /// Wait up to `grace` for the stream to end, then cancel.
    ///
    /// # Errors
    ///
    /// Returns an error if the task panicked or was aborted.
    pub async fn shutdown(mut self, grace: Duration) -> Result<DispatchSummary, DispatchError> {
        let joined = match tokio::time::timeout(grace, &mut self.task).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::debug!(?grace, "Dispatcher still reading, cancelling");
                self.cancel.cancel();
                self.task.await
            }
        };
        let (summary, _sink) = joined?;
        Ok(summary)
    }
}
