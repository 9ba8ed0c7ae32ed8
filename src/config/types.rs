//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dispatch::MalformedFramePolicy;
use crate::session::{SessionConfig, DEFAULT_SESSION_ID, DEFAULT_WS_ADDRESS};

/// Client configuration, loaded from TOML and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QdbConfig {
    /// WebSocket address template containing `{uuid}`.
    pub ws_address: String,
    /// Session identifier substituted into the address.
    pub uuid: String,
    /// Authentication message sent with `start`.
    pub auth_msg: String,
    /// REPL prompt.
    pub prompt: String,
    /// Directory holding trace files.
    pub output_dir: PathBuf,
    /// Keep the trace file after the session ends.
    pub keep_trace: bool,
    /// How long to wait for the server to close after quitting.
    pub shutdown_timeout_ms: u64,
    /// Handling of frames that are not well-formed events.
    pub on_malformed: MalformedFramePolicy,
}

impl Default for QdbConfig {
    fn default() -> Self {
        Self {
            ws_address: DEFAULT_WS_ADDRESS.to_string(),
            uuid: DEFAULT_SESSION_ID.to_string(),
            auth_msg: String::new(),
            prompt: "(qdb) ".to_string(),
            output_dir: PathBuf::from("/tmp/qdb"),
            keep_trace: false,
            shutdown_timeout_ms: 2000,
            on_malformed: MalformedFramePolicy::Terminate,
        }
    }
}

impl QdbConfig {
    /// Session identity for this configuration.
    #[must_use]
    pub fn session(&self) -> SessionConfig {
        SessionConfig::new(&self.ws_address, &self.uuid, &self.auth_msg)
    }

    /// Trace file for this session: `<output_dir>/.<uuid>`.
    #[must_use]
    pub fn trace_path(&self) -> PathBuf {
        self.output_dir.join(format!(".{}", self.uuid))
    }

    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
