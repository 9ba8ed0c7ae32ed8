//! Line-oriented trace output.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::SinkError;

/// Append-only line writer. Every line is flushed before `write_line`
/// returns, so a reader tailing the file sees it immediately.
#[derive(Debug)]
pub struct OutputSink<W> {
    writer: W,
    path: Option<PathBuf>,
    lines: usize,
    closed: bool,
}

impl OutputSink<File> {
    /// Create (or truncate) the trace file at `path`, creating its parent
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| SinkError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "Opened trace file");

        Ok(Self {
            writer: file,
            path: Some(path),
            lines: 0,
            closed: false,
        })
    }
}

impl<W: AsyncWrite + Unpin + Send> OutputSink<W> {
    /// Wrap an arbitrary writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            path: None,
            lines: 0,
            closed: false,
        }
    }

    /// Write one line and flush it.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Closed` after [`close`](Self::close), or an I/O
    /// error from the writer.
    pub async fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        self.lines += 1;
        Ok(())
    }

    /// Shut the writer down. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the final shutdown fails.
    pub async fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.shutdown().await?;
        Ok(())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of lines written.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Path of the trace file, when backed by one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
