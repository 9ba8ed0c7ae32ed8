//! Session identity and addressing.

use url::Url;

use super::ChannelError;

/// Default WebSocket address template; `{uuid}` is replaced by the session id.
pub const DEFAULT_WS_ADDRESS: &str = "ws://localhost:8002/debug_session/{uuid}";

/// Default session identifier.
pub const DEFAULT_SESSION_ID: &str = "qdb";

/// Placeholder substituted with the session id.
pub const UUID_PLACEHOLDER: &str = "{uuid}";

/// Identity of one debugging session. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    address_template: String,
    session_id: String,
    auth_payload: String,
}

impl SessionConfig {
    #[must_use]
    pub fn new(
        address_template: impl Into<String>,
        session_id: impl Into<String>,
        auth_payload: impl Into<String>,
    ) -> Self {
        Self {
            address_template: address_template.into(),
            session_id: session_id.into(),
            auth_payload: auth_payload.into(),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Payload of the `start` command.
    #[must_use]
    pub fn auth_payload(&self) -> &str {
        &self.auth_payload
    }

    /// Resolve the address template into a WebSocket URL.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::InvalidAddress` if the result does not parse or
    /// its scheme is not `ws`/`wss`.
    pub fn address(&self) -> Result<Url, ChannelError> {
        let address = self
            .address_template
            .replace(UUID_PLACEHOLDER, &self.session_id);
        let url = Url::parse(&address).map_err(|e| ChannelError::InvalidAddress {
            address: address.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "ws" | "wss" => Ok(url),
            other => Err(ChannelError::InvalidAddress {
                address,
                reason: format!("scheme must be ws or wss, got {other}"),
            }),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WS_ADDRESS, DEFAULT_SESSION_ID, "")
    }
}
