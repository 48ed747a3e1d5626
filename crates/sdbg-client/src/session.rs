//! Debugger session lifecycle.
//!
//! A [`DebuggerClient`] owns the transport and the session flags. The
//! flags are never mutated from outside: `connected` changes only in
//! [`DebuggerClient::create`] and [`DebuggerClient::delete`], and `halted`
//! is recomputed by every thread resolution (see [`crate::thread`]).

use tracing::info;

use crate::error::ClientError;
use crate::transport::{ClientSettings, ProtocolRequest, Transport, Verb};

/// The connection flags of a single debugger session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// A client is attached on the server.
    pub(crate) connected: bool,
    /// The latest thread resolution found a halted thread.
    pub(crate) halted: bool,
}

impl SessionState {
    #[cfg(test)]
    pub(crate) fn connected() -> Self {
        Self {
            connected: true,
            halted: false,
        }
    }
}

/// A client for one remote script-debugging session.
///
/// All protocol operations go through this handle; one outstanding
/// operation at a time, each blocking until the server answers or the
/// transport timeout elapses.
#[derive(Debug)]
pub struct DebuggerClient {
    transport: Transport,
    session: SessionState,
}

impl DebuggerClient {
    /// Create a client for the sandbox named in `settings`.
    ///
    /// The session starts disconnected; call [`create`](Self::create) to
    /// attach on the server.
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(settings)?,
            session: SessionState::default(),
        })
    }

    /// Create a client against an explicit base URL instead of the
    /// standard sandbox path. Intended for tests against a local server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        settings: &ClientSettings,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::with_base_url(base_url.into(), settings)?,
            session: SessionState::default(),
        })
    }

    /// Whether a client is attached on the server.
    pub fn is_connected(&self) -> bool {
        self.session.connected
    }

    /// Whether the latest thread resolution found a halted thread.
    pub fn is_halted(&self) -> bool {
        self.session.halted
    }

    /// Attach a debugger client on the server (`POST /client`).
    ///
    /// On success the session becomes connected. On failure it stays
    /// disconnected and the failure is surfaced. The server tolerates
    /// repeated create calls; no dedupe happens here.
    pub async fn create(&mut self) -> Result<(), ClientError> {
        // Bypasses the connected gate: this call is what connects.
        self.transport
            .execute_unchecked(ProtocolRequest::new(Verb::Post, "/client"))
            .await?;
        self.session.connected = true;
        info!("debugger client attached");
        Ok(())
    }

    /// Detach the client (`DELETE /client`), which also releases all
    /// breakpoints and resumes all halted threads on the server.
    ///
    /// The session is marked disconnected regardless of the response: a
    /// client that believed itself connected after a server-side teardown
    /// would only issue doomed requests.
    pub async fn delete(&mut self) -> Result<(), ClientError> {
        if !self.session.connected {
            return Err(ClientError::NotConnected);
        }
        let result = self
            .transport
            .execute(&self.session, ProtocolRequest::new(Verb::Delete, "/client"))
            .await;
        self.session.connected = false;
        self.session.halted = false;
        result.map(|_| {
            info!("debugger client detached");
        })
    }

    /// Issue a gated protocol request.
    pub(crate) async fn request(
        &self,
        request: ProtocolRequest<'_>,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        self.transport.execute(&self.session, request).await
    }

    pub(crate) fn set_halted(&mut self, halted: bool) {
        self.session.halted = halted;
    }

    #[cfg(test)]
    pub(crate) fn mark_connected(&mut self) {
        self.session.connected = true;
    }
}
