//! Send and receive halves of the session connection.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::stream::{self, SplitSink};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{ChannelError, SessionConfig};
use crate::protocol::{encode_command, Command};

/// Client-side WebSocket stream.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of a client WebSocket.
pub type WsSink = SplitSink<WsStream, Message>;

/// Lazy sequence of raw inbound text frames.
///
/// Ends when the server closes the connection. Transport failures are
/// yielded once as an error, after which the stream ends.
pub type InboundFrames = Pin<Box<dyn futures_core::Stream<Item = Result<String, ChannelError>> + Send>>;

/// Destination for outbound text frames.
#[async_trait]
pub trait FrameSink: Send {
    /// Write one text frame.
    async fn send_frame(&mut self, frame: String) -> Result<(), ChannelError>;

    /// Close the underlying connection for writing.
    async fn close(&mut self) -> Result<(), ChannelError>;
}

#[async_trait]
impl<S> FrameSink for SplitSink<S, Message>
where
    S: Sink<Message, Error = WsError> + Send + Unpin,
{
    async fn send_frame(&mut self, frame: String) -> Result<(), ChannelError> {
        SinkExt::send(self, Message::Text(frame)).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        match SinkExt::close(self).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process loopback: frames are delivered to the paired receiver.
#[async_trait]
impl FrameSink for mpsc::UnboundedSender<String> {
    async fn send_frame(&mut self, frame: String) -> Result<(), ChannelError> {
        self.send(frame).map_err(|_| ChannelError::Closed)
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        Ok(())
    }
}

/// Owner of the send half. Sends are serialized through `&mut self`.
#[derive(Debug)]
pub struct CommandSender<S> {
    sink: Option<S>,
    sent: usize,
}

impl<S: FrameSink> CommandSender<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink: Some(sink),
            sent: 0,
        }
    }

    /// Encode and send one command.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Closed` after [`close`](Self::close), or a
    /// transport/codec error if the frame cannot be written.
    pub async fn send(&mut self, command: &Command) -> Result<(), ChannelError> {
        let sink = self.sink.as_mut().ok_or(ChannelError::Closed)?;
        let frame = encode_command(command)?;
        tracing::debug!(tag = command.tag(), frame = %frame, "Sending command");
        sink.send_frame(frame).await?;
        self.sent += 1;
        Ok(())
    }

    /// Close the send half. Further sends fail with `ChannelError::Closed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the close handshake cannot be written.
    pub async fn close(&mut self) -> Result<(), ChannelError> {
        if let Some(mut sink) = self.sink.take() {
            tracing::debug!(sent = self.sent, "Closing command channel");
            sink.close().await?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }

    /// Number of commands written so far.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.sent
    }
}

/// Turn the read half of a WebSocket into a stream of text frames.
///
/// Ping and pong frames are skipped, binary frames are passed on when they
/// hold UTF-8, and a close frame ends the stream.
pub fn inbound_frames<R>(read: R) -> InboundFrames
where
    R: Stream<Item = Result<Message, WsError>> + Send + Unpin + 'static,
{
    Box::pin(stream::unfold(Some(read), |state| async move {
        let mut read = state?;
        loop {
            match read.next().await {
                Some(Ok(Message::Text(text))) => return Some((Ok(text), Some(read))),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => return Some((Ok(text), Some(read))),
                    Err(_) => tracing::warn!("Ignoring non-UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "Server closed the session");
                    return None;
                }
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    return None;
                }
                Some(Err(e)) => return Some((Err(ChannelError::from(e)), None)),
            }
        }
    }))
}

/// Open the session and send `start` with the auth payload.
///
/// # Errors
///
/// Returns an error if the address is invalid, the handshake fails, or the
/// `start` command cannot be written.
pub async fn connect(
    config: &SessionConfig,
) -> Result<(CommandSender<WsSink>, InboundFrames), ChannelError> {
    let url = config.address()?;
    tracing::info!(address = %url, session = config.session_id(), "Connecting to debug session");

    let (stream, _response) =
        connect_async(url.as_str())
            .await
            .map_err(|source| ChannelError::Connect {
                address: url.to_string(),
                source: Box::new(source),
            })?;
    let (write, read) = stream.split();

    let mut sender = CommandSender::new(write);
    sender
        .send(&Command::Start {
            auth: config.auth_payload().to_string(),
        })
        .await?;

    Ok((sender, inbound_frames(read)))
}
