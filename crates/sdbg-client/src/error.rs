//! Client error types.

use thiserror::Error;

/// Errors from debugger client operations.
///
/// None of these are fatal to the session: after any single failure the
/// client remains usable and the caller may re-issue the command.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No debugger client is attached to the server.
    #[error("debugger not connected")]
    NotConnected,

    /// No script thread is currently halted.
    #[error("debugger not halted")]
    NotHalted,

    /// The server answered with a status outside the accepted set.
    #[error("server returned status {status}")]
    Http {
        /// The HTTP status code.
        status: u16,
    },

    /// Network-level communication error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response parsed but an expected field was absent.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The client could not be constructed from the given settings.
    #[error("invalid client settings: {0}")]
    InvalidSettings(String),
}

impl ClientError {
    /// Normalize a reqwest failure into the client taxonomy.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}
