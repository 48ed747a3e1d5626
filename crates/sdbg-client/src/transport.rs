//! Authenticated HTTP transport for the Script Debugger API.
//!
//! Every call goes through [`Transport::execute`], which normalizes the
//! response into a single outcome: parsed JSON on an accepted status,
//! [`ClientError`] for everything else (bad status, network failure,
//! timeout). The connected gate lives here so no protocol operation can
//! reach the network without an attached client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::ClientError;
use crate::protocol::PROTOCOL_VERSION;
use crate::session::SessionState;

/// Value of the client-identifying header attached to every request.
const CLIENT_ID: &str = "sdbg-cli-debugger";

/// Header carrying the client id.
const CLIENT_ID_HEADER: &str = "x-dw-client-id";

/// Settings needed to construct a client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Sandbox hostname without scheme.
    pub hostname: String,
    /// Business Manager username.
    pub username: String,
    /// Business Manager password.
    pub password: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Log request and response bodies verbatim.
    pub trace: bool,
}

impl ClientSettings {
    /// Settings with the default 10 second timeout and tracing off.
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(10),
            trace: false,
        }
    }
}

/// HTTP verb of a protocol request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
        }
    }
}

/// A single request against the debugger API.
#[derive(Debug)]
pub(crate) struct ProtocolRequest<'a> {
    pub verb: Verb,
    /// Path relative to the versioned base, starting with `/`.
    pub path: String,
    /// Optional query pair; the value is percent-encoded by reqwest.
    pub query: Option<(&'static str, &'a str)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

impl<'a> ProtocolRequest<'a> {
    pub(crate) fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    pub(crate) fn with_query(mut self, key: &'static str, value: &'a str) -> Self {
        self.query = Some((key, value));
        self
    }

    pub(crate) fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The authenticated HTTP channel to one sandbox.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
    trace: bool,
}

impl Transport {
    /// Build a transport for the sandbox named in `settings`.
    pub(crate) fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let base_url = format!(
            "https://{}/s/-/dw/debugger/v{}",
            settings.hostname, PROTOCOL_VERSION
        );
        Self::with_base_url(base_url, settings)
    }

    /// Build a transport against an explicit base URL. Used by tests to
    /// point at a local mock server.
    pub(crate) fn with_base_url(
        base_url: String,
        settings: &ClientSettings,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let credentials = BASE64.encode(format!("{}:{}", settings.username, settings.password));
        let mut auth = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| ClientError::InvalidSettings(format!("authorization header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CLIENT_ID_HEADER, HeaderValue::from_static(CLIENT_ID));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ClientError::InvalidSettings(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            trace: settings.trace,
        })
    }

    /// Issue a request, requiring an attached client.
    ///
    /// Returns the parsed JSON body, or `None` when the server answered
    /// with an empty body (204).
    pub(crate) async fn execute(
        &self,
        session: &SessionState,
        request: ProtocolRequest<'_>,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        if !session.connected {
            return Err(ClientError::NotConnected);
        }
        self.execute_unchecked(request).await
    }

    /// Issue a request without the connected gate. Only the client-creation
    /// call uses this, since it is what establishes the connection.
    pub(crate) async fn execute_unchecked(
        &self,
        request: ProtocolRequest<'_>,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        if self.trace {
            debug!(
                "request {} {} body={}",
                request.verb.as_str(),
                request.path,
                request
                    .body
                    .as_ref()
                    .map(|b| b.to_string())
                    .unwrap_or_default()
            );
        }

        let mut builder = match request.verb {
            Verb::Get => self.http.get(&url),
            Verb::Post => self.http.post(&url),
            Verb::Delete => self.http.delete(&url),
        };
        if let Some((key, value)) = request.query {
            builder = builder.query(&[(key, value)]);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ClientError::from_reqwest)?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(ClientError::from_reqwest)?;
        if self.trace {
            debug!("response {} {} body={}", status.as_u16(), request.path, text);
        }
        if text.is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&text)
            .map_err(|e| ClientError::MalformedResponse(format!("invalid JSON body: {e}")))?;
        Ok(Some(value))
    }
}
