//! Dispatcher error types.

use std::path::PathBuf;

/// Errors writing the trace output.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    /// The trace directory could not be created.
    #[error("Failed to create trace directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The trace file could not be opened.
    #[error("Failed to open trace file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A write after the sink was closed.
    #[error("Output sink closed")]
    Closed,

    /// I/O error while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced when joining the dispatcher task.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    /// The dispatcher task panicked or was aborted.
    #[error("Dispatcher task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
