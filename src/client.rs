//! Session orchestration: connect, spawn the dispatcher, drive the REPL.

use tokio::io::AsyncBufRead;

use crate::config::QdbConfig;
use crate::dispatch::{DispatchError, DispatchSummary, Dispatcher, OutputSink, SinkError};
use crate::display;
use crate::protocol::DisableMode;
use crate::repl::{Repl, ReplError};
use crate::session::{connect, ChannelError};

/// Errors that end a client session.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Repl(#[from] ReplError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Outcome of a completed session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Mode sent with the final `disable`.
    pub mode: DisableMode,
    /// Commands written, including `start` and `disable`.
    pub commands_sent: usize,
    pub dispatch: DispatchSummary,
}

/// Run one debugging session reading commands from `input`.
///
/// The dispatcher is spawned as soon as the connection is up and renders
/// into the trace file while commands are read. After quitting, the send
/// half is closed and the dispatcher is given
/// [`QdbConfig::shutdown_timeout`] to see the server close before it is
/// cancelled.
///
/// # Errors
///
/// Returns an error if the connection, the trace file, or reading input
/// fails.
pub async fn run_session<R>(config: &QdbConfig, input: R) -> Result<SessionReport, ClientError>
where
    R: AsyncBufRead + Unpin,
{
    let session = config.session();
    let address = session.address()?;
    let (sender, frames) = connect(&session).await?;

    let trace_path = config.trace_path();
    let sink = OutputSink::create(&trace_path).await?;
    let dispatcher = Dispatcher::new(frames, sink)
        .with_policy(config.on_malformed)
        .spawn();

    display::print_connected(address.as_str(), &trace_path);

    let mut repl = Repl::new(sender);
    let result = repl.run(input, &config.prompt).await;
    let commands_sent = repl.commands_sent();

    let mut sender = repl.into_sender();
    if let Err(e) = sender.close().await {
        tracing::warn!(error = %e, "Failed to close session cleanly");
    }

    let mode = match result {
        Ok(mode) => mode,
        Err(e) => {
            dispatcher.cancel();
            if let Err(join_err) = dispatcher.join().await {
                tracing::warn!(error = %join_err, "Dispatcher did not stop cleanly");
            }
            remove_trace(config).await;
            return Err(e.into());
        }
    };

    let dispatch = dispatcher.shutdown(config.shutdown_timeout()).await?;
    remove_trace(config).await;

    Ok(SessionReport {
        mode,
        commands_sent,
        dispatch,
    })
}

async fn remove_trace(config: &QdbConfig) {
    if config.keep_trace {
        return;
    }
    let path = config.trace_path();
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove trace file");
    }
}
