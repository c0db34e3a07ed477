use std::path::PathBuf;

use thiserror::Error;

/// Failures before an HTTP status code is known.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Errors surfaced by the login, message and file operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("login failed with status: {status}")]
    Authentication { status: u16 },

    #[error("malformed login response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("could not encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("cannot open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send with status: {status}")]
    Send { status: u16 },
}

impl ClientError {
    /// The HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { status } | ClientError::Send { status } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
